pub mod grid;
pub mod orchestrator;
pub mod space;

pub use grid::TrialEnumerator;
pub use orchestrator::{pareto_frontier, run_search, select_recommended, SearchResults, TrialResult, TrialSink};
pub use space::PromptSpace;
