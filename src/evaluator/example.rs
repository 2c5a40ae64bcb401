use tracing::debug;

use crate::backend::{Generator, Tokenizer};
use crate::config::{GenerationConfig, TokenAccounting};
use crate::error::Result;
use crate::metrics::{rouge_l, tokens_per_joule, EnergySampler};
use crate::models::{DatasetRecord, EvaluationResult, PromptConfig};
use crate::prompts::render_prompt;

/// Runs one record through render, encode, generate, decode and score.
///
/// Holds no state between calls; all collaborators are borrowed.
pub struct Evaluator<'a> {
    tokenizer: &'a dyn Tokenizer,
    generator: &'a dyn Generator,
    sampler: EnergySampler<'a>,
    generation: GenerationConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        tokenizer: &'a dyn Tokenizer,
        generator: &'a dyn Generator,
        sampler: EnergySampler<'a>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            tokenizer,
            generator,
            sampler,
            generation,
        }
    }

    pub fn has_power_source(&self) -> bool {
        self.sampler.has_power_source()
    }

    /// Evaluate a single record under `cfg`.
    ///
    /// Only the model call is timed and power-sampled; waiting inside the
    /// generator (serialization, timeout worker) is excluded.
    pub fn evaluate(&self, record: &DatasetRecord, cfg: &PromptConfig) -> Result<EvaluationResult> {
        let prompt = render_prompt(&record.doc, cfg);
        let input_ids = self.tokenizer.encode(&prompt)?;

        let max_new_tokens = self.generation.max_new_tokens;
        let measured = self.sampler.measure_interval(|clock| {
            self.generator
                .generate_timed(&input_ids, max_new_tokens, clock)
        })?;
        let output_ids = measured.value;

        let counted: &[_] = match self.generation.token_accounting {
            TokenAccounting::FullSequence => &output_ids,
            TokenAccounting::NewTokens => output_ids.get(input_ids.len()..).unwrap_or_default(),
        };

        let generated = self.tokenizer.decode(counted)?;
        let rouge = rouge_l(&generated, &record.reference);
        let token_count = counted.len();

        debug!(
            input_tokens = input_ids.len(),
            tokens = token_count,
            latency_s = measured.latency_s,
            energy_j = measured.energy_j,
            rouge_l = rouge,
            "example evaluated"
        );

        Ok(EvaluationResult {
            doc: record.doc.clone(),
            prompt,
            generated,
            rouge_l: rouge,
            energy_j: measured.energy_j,
            latency_s: measured.latency_s,
            token_count,
            tokens_per_joule: tokens_per_joule(token_count, measured.energy_j),
        })
    }
}
