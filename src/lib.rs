pub mod backend;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod output;
pub mod prompts;
pub mod runner;
pub mod search;

pub use config::Config;
pub use error::{EapoError, Result};
pub use models::{DatasetRecord, EvaluationResult, PromptConfig, SummaryMetrics};
