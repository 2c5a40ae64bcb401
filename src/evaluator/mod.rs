pub mod dataset;
pub mod example;

pub use example::Evaluator;

use crate::error::Result;
use crate::models::EvaluationResult;

/// Receives per-example results as they are produced.
pub trait ExampleSink {
    fn write_example(&mut self, result: &EvaluationResult) -> Result<()>;
}

impl ExampleSink for Vec<EvaluationResult> {
    fn write_example(&mut self, result: &EvaluationResult) -> Result<()> {
        self.push(result.clone());
        Ok(())
    }
}
