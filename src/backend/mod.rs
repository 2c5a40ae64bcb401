//! Capabilities of the external collaborators: tokenizer, generative model
//! and power telemetry. The evaluation pipeline only talks to these traits,
//! so any backend (or a deterministic test double) can be plugged in.

pub mod guard;
pub mod lead;
pub mod power;
pub mod vocab;

pub use guard::GuardedGenerator;
pub use lead::{LeadModel, ModelCard};
pub use power::{FixedPowerSource, PowerUnit, SysfsPowerSource, Telemetry};
pub use vocab::VocabTokenizer;

use std::time::Duration;

use crate::error::Result;
use crate::metrics::Clock;

pub type TokenId = u32;

/// Text <-> token id conversion.
pub trait Tokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>>;
    fn decode(&self, ids: &[TokenId]) -> Result<String>;
}

/// Autoregressive generation.
///
/// The returned sequence contains the input ids as a prefix followed by up to
/// `max_new_tokens` newly generated ids.
pub trait Generator: Send + Sync {
    fn generate(&self, input: &[TokenId], max_new_tokens: usize) -> Result<Vec<TokenId>>;

    /// `generate` together with the time spent in the model call alone.
    ///
    /// Wrappers that wait before or after the call override this so the
    /// wait is left out of the interval.
    fn generate_timed(
        &self,
        input: &[TokenId],
        max_new_tokens: usize,
        clock: &dyn Clock,
    ) -> Result<(Vec<TokenId>, Duration)> {
        let start = clock.now();
        let output = self.generate(input, max_new_tokens)?;
        Ok((output, clock.now().saturating_sub(start)))
    }
}

/// Instantaneous device power draw.
pub trait PowerSource {
    fn sample_watts(&self) -> Result<f64>;
}
