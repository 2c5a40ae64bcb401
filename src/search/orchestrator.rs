use std::cmp::Ordering;

use tracing::info;

use crate::dataset::RecordSource;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::models::{PromptConfig, SummaryMetrics};
use crate::search::space::PromptSpace;

/// One evaluated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    /// Position in enumeration order, starting at 0.
    pub index: usize,
    pub config: PromptConfig,
    pub summary: SummaryMetrics,
}

impl TrialResult {
    /// True if `other` is at least as good on quality, energy and latency,
    /// and strictly better on at least one.
    pub fn is_dominated_by(&self, other: &Self) -> bool {
        let (a, b) = (&self.summary, &other.summary);
        let no_worse = b.avg_rouge_l >= a.avg_rouge_l
            && b.total_energy_j <= a.total_energy_j
            && b.total_latency_s <= a.total_latency_s;
        let better = b.avg_rouge_l > a.avg_rouge_l
            || b.total_energy_j < a.total_energy_j
            || b.total_latency_s < a.total_latency_s;
        no_worse && better
    }
}

/// Receives one summary row per finished trial.
pub trait TrialSink {
    fn write_trial(&mut self, trial: &TrialResult) -> Result<()>;
}

impl TrialSink for Vec<TrialResult> {
    fn write_trial(&mut self, trial: &TrialResult) -> Result<()> {
        self.push(trial.clone());
        Ok(())
    }
}

/// Outcome of a search run.
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// All trials in enumeration order.
    pub trials: Vec<TrialResult>,
    /// Indices into `trials` of non-dominated results.
    pub pareto_indices: Vec<usize>,
    /// Index into `trials` of the recommended configuration.
    pub recommended: Option<usize>,
}

/// Indices of trials not dominated by any other trial.
pub fn pareto_frontier(trials: &[TrialResult]) -> Vec<usize> {
    (0..trials.len())
        .filter(|&i| !trials.iter().any(|other| trials[i].is_dominated_by(other)))
        .collect()
}

/// Highest-quality frontier member; ties go to lower energy, then latency.
pub fn select_recommended(trials: &[TrialResult], pareto_indices: &[usize]) -> Option<usize> {
    pareto_indices.iter().copied().max_by(|&a, &b| {
        let (x, y) = (&trials[a].summary, &trials[b].summary);
        x.avg_rouge_l
            .partial_cmp(&y.avg_rouge_l)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                y.total_energy_j
                    .partial_cmp(&x.total_energy_j)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                y.total_latency_s
                    .partial_cmp(&x.total_latency_s)
                    .unwrap_or(Ordering::Equal)
            })
            // Earlier trial wins a full tie.
            .then_with(|| b.cmp(&a))
    })
}

/// Evaluate up to `budget` configurations of `space` over `dataset`.
///
/// Each trial folds the whole dataset in summary mode and is written to
/// `sink` before the next one starts. The first failing trial aborts the
/// search; trials already written stay in the sink.
pub fn run_search(
    space: &PromptSpace,
    budget: usize,
    dataset: &dyn RecordSource,
    evaluator: &Evaluator<'_>,
    sink: &mut dyn TrialSink,
) -> Result<SearchResults> {
    let trials_iter = space.trials(budget);
    let total = trials_iter.len();
    info!(
        trials = total,
        grid_size = space.size(),
        power = evaluator.has_power_source(),
        "starting grid search"
    );

    let mut trials = Vec::with_capacity(total);
    let mut best_rouge = f64::NEG_INFINITY;

    for (index, config) in trials_iter.enumerate() {
        let summary = evaluator.run_summary(dataset.records()?, &config)?;
        let trial = TrialResult {
            index,
            config,
            summary,
        };
        sink.write_trial(&trial)?;

        info!(
            trial = index + 1,
            of = total,
            prompt = %config.display(),
            rouge_l = summary.avg_rouge_l,
            energy_j = summary.total_energy_j,
            latency_s = summary.total_latency_s,
            "trial finished"
        );

        if summary.avg_rouge_l > best_rouge {
            best_rouge = summary.avg_rouge_l;
            println!(
                "[{}/{}] New best: rougeL={:.4} energy={:.2}J latency={:.2}s  {}",
                index + 1,
                total,
                summary.avg_rouge_l,
                summary.total_energy_j,
                summary.total_latency_s,
                config.display()
            );
        }

        trials.push(trial);
    }

    let pareto_indices = pareto_frontier(&trials);
    let recommended = select_recommended(&trials, &pareto_indices);

    Ok(SearchResults {
        trials,
        pareto_indices,
        recommended,
    })
}
