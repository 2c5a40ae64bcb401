pub mod clock;
pub mod energy;
pub mod rouge;

pub use clock::{Clock, MonotonicClock};
pub use energy::{tokens_per_joule, EnergySampler, Measured};
pub use rouge::{lcs_length, rouge_l};
