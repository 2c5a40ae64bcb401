use tracing::{debug, info};

use crate::error::Result;
use crate::evaluator::example::Evaluator;
use crate::evaluator::ExampleSink;
use crate::models::{DatasetRecord, PromptConfig, SummaryAccumulator, SummaryMetrics};

impl Evaluator<'_> {
    /// Evaluate every record in order and stream each result to `sink`.
    ///
    /// Results are not buffered; the returned summary is folded from the same
    /// stream the sink received. The first error aborts the run, leaving
    /// whatever the sink already wrote in place.
    pub fn run_detailed<I>(
        &self,
        records: I,
        cfg: &PromptConfig,
        sink: &mut dyn ExampleSink,
    ) -> Result<SummaryMetrics>
    where
        I: IntoIterator<Item = Result<DatasetRecord>>,
    {
        let mut acc = SummaryAccumulator::new();

        for record in records {
            let result = self.evaluate(&record?, cfg)?;
            sink.write_example(&result)?;
            acc.add(&result);
            debug!(example = acc.count(), rouge_l = result.rouge_l, "example written");
        }

        info!(
            prompt = %cfg.display(),
            examples = acc.count(),
            "detailed evaluation finished"
        );
        Ok(acc.finish())
    }

    /// Evaluate every record in order, keeping only running sums.
    pub fn run_summary<I>(&self, records: I, cfg: &PromptConfig) -> Result<SummaryMetrics>
    where
        I: IntoIterator<Item = Result<DatasetRecord>>,
    {
        let mut acc = SummaryAccumulator::new();

        for record in records {
            let result = self.evaluate(&record?, cfg)?;
            acc.add(&result);
        }

        debug!(
            prompt = %cfg.display(),
            examples = acc.count(),
            tokens = acc.total_tokens(),
            "summary evaluation finished"
        );
        Ok(acc.finish())
    }
}
