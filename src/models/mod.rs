pub mod prompt;
pub mod record;

pub use prompt::{Brevity, Dimension, Format, PromptConfig, Reasoning, Style, DIMENSION_NAMES};
pub use record::{DatasetRecord, EvaluationResult, SummaryAccumulator, SummaryMetrics};
