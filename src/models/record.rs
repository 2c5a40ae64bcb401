use serde::{Deserialize, Serialize};

use crate::metrics::tokens_per_joule;

/// One line of the input dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Source text to summarize.
    pub doc: String,

    /// Gold reference summary.
    #[serde(rename = "ref")]
    pub reference: String,
}

impl DatasetRecord {
    pub fn new(doc: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            doc: doc.into(),
            reference: reference.into(),
        }
    }
}

/// Measurements for one dataset record under one prompt configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub doc: String,
    pub prompt: String,
    pub generated: String,
    /// Rouge-L F1 in [0, 1].
    pub rouge_l: f64,
    pub energy_j: f64,
    pub latency_s: f64,
    pub token_count: usize,
    pub tokens_per_joule: f64,
}

/// Aggregate metrics for one prompt configuration over a whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryMetrics {
    #[serde(rename = "rougeL")]
    pub avg_rouge_l: f64,
    #[serde(rename = "energy_J")]
    pub total_energy_j: f64,
    #[serde(rename = "latency_s")]
    pub total_latency_s: f64,
    #[serde(rename = "tpj")]
    pub tokens_per_joule: f64,
}

/// Running sums folded from a stream of [`EvaluationResult`]s.
///
/// Both the summary and detailed evaluation paths fold through this type, so
/// recomputing a summary from the detailed stream gives the same numbers.
#[derive(Debug, Clone, Default)]
pub struct SummaryAccumulator {
    count: usize,
    sum_rouge: f64,
    sum_energy: f64,
    sum_latency: f64,
    sum_tokens: usize,
}

impl SummaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: &EvaluationResult) {
        self.count += 1;
        self.sum_rouge += result.rouge_l;
        self.sum_energy += result.energy_j;
        self.sum_latency += result.latency_s;
        self.sum_tokens += result.token_count;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn total_tokens(&self) -> usize {
        self.sum_tokens
    }

    pub fn finish(&self) -> SummaryMetrics {
        let avg_rouge_l = if self.count > 0 {
            self.sum_rouge / self.count as f64
        } else {
            0.0
        };

        SummaryMetrics {
            avg_rouge_l,
            total_energy_j: self.sum_energy,
            total_latency_s: self.sum_latency,
            tokens_per_joule: tokens_per_joule(self.sum_tokens, self.sum_energy),
        }
    }
}

impl<'a> FromIterator<&'a EvaluationResult> for SummaryAccumulator {
    fn from_iter<I: IntoIterator<Item = &'a EvaluationResult>>(iter: I) -> Self {
        let mut acc = SummaryAccumulator::new();
        for result in iter {
            acc.add(result);
        }
        acc
    }
}
