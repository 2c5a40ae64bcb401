use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{EapoError, Result};
use crate::models::{PromptConfig, SummaryMetrics};
use crate::search::{SearchResults, TrialResult};

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let mut file = File::create(path).map_err(|e| EapoError::output(path, e))?;
    file.write_all(serde_json::to_string_pretty(value)?.as_bytes())
        .map_err(|e| EapoError::output(path, e))?;
    Ok(())
}

fn trial_json(trial: &TrialResult) -> serde_json::Value {
    serde_json::json!({
        "trial": trial.index + 1,
        "prompt": trial.config,
        "metrics": trial.summary,
    })
}

/// Write the summary of an evaluate-mode run.
pub fn write_summary_json(
    path: &Path,
    config: &PromptConfig,
    examples: usize,
    summary: &SummaryMetrics,
) -> Result<()> {
    let json = serde_json::json!({
        "prompt": config,
        "examples": examples,
        "metrics": summary,
    });
    write_json(path, &json)
}

/// Write the Pareto frontier of a search run, recommended trial first.
pub fn write_pareto_json(path: &Path, results: &SearchResults) -> Result<()> {
    let json = serde_json::json!({
        "trials": results.trials.len(),
        "recommended": results.recommended.map(|i| trial_json(&results.trials[i])),
        "frontier": results
            .pareto_indices
            .iter()
            .map(|&i| trial_json(&results.trials[i]))
            .collect::<Vec<_>>(),
    });
    write_json(path, &json)
}

pub fn print_evaluation_summary(config: &PromptConfig, examples: usize, summary: &SummaryMetrics) {
    println!();
    println!("=== Evaluation Summary ===");
    println!("Prompt:        {}", config.display());
    println!("Examples:      {}", examples);
    println!("Avg Rouge-L:   {:.4}", summary.avg_rouge_l);
    println!("Total energy:  {:.3} J", summary.total_energy_j);
    println!("Total latency: {:.3} s", summary.total_latency_s);
    println!("Tokens/J:      {:.3}", summary.tokens_per_joule);
    println!();
}

fn print_trial(rank: usize, trial: &TrialResult, label: &str) {
    println!(
        "#{}: rougeL={:.4} energy={:.2}J latency={:.2}s tpj={:.2}{}",
        rank,
        trial.summary.avg_rouge_l,
        trial.summary.total_energy_j,
        trial.summary.total_latency_s,
        trial.summary.tokens_per_joule,
        label
    );
    println!("    {}", trial.config.display());
}

/// Print the best `k` trials by Rouge-L.
pub fn print_top_trials(results: &SearchResults, k: usize) {
    let mut order: Vec<&TrialResult> = results.trials.iter().collect();
    order.sort_by(|a, b| {
        b.summary
            .avg_rouge_l
            .partial_cmp(&a.summary.avg_rouge_l)
            .unwrap_or(Ordering::Equal)
    });

    println!("\n=== Top {} Trials (by Rouge-L) ===\n", k.min(order.len()));
    for (i, trial) in order.into_iter().take(k).enumerate() {
        print_trial(i + 1, trial, "");
    }
    println!();
}

/// Print the Pareto frontier with the recommended trial marked.
pub fn print_pareto_frontier(results: &SearchResults) {
    println!(
        "\n=== Pareto Frontier ({} non-dominated of {} trials) ===\n",
        results.pareto_indices.len(),
        results.trials.len()
    );

    // Cheapest first, so the list reads as a quality-for-energy ladder.
    let mut sorted = results.pareto_indices.clone();
    sorted.sort_by(|&a, &b| {
        let (x, y) = (&results.trials[a].summary, &results.trials[b].summary);
        x.total_energy_j
            .partial_cmp(&y.total_energy_j)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                x.total_latency_s
                    .partial_cmp(&y.total_latency_s)
                    .unwrap_or(Ordering::Equal)
            })
    });

    for (rank, &idx) in sorted.iter().enumerate() {
        let label = if results.recommended == Some(idx) {
            "  <- recommended"
        } else {
            ""
        };
        print_trial(rank + 1, &results.trials[idx], label);
    }

    if results.trials.iter().all(|t| t.summary.total_energy_j == 0.0) && !results.trials.is_empty() {
        println!("\nNo power telemetry was available: energy and tokens/J are 0 for every trial.");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Brevity, Style};
    use tempfile::TempDir;

    #[test]
    fn test_summary_json_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let cfg = PromptConfig {
            style: Style::Concise,
            brevity: Brevity::OneSentence,
            ..Default::default()
        };
        let summary = SummaryMetrics {
            avg_rouge_l: 0.5,
            total_energy_j: 2.0,
            total_latency_s: 3.0,
            tokens_per_joule: 10.0,
        };
        write_summary_json(&path, &cfg, 2, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["examples"], 2);
        assert_eq!(value["prompt"]["style"], "concise");
        assert_eq!(value["prompt"]["reasoning"], "");
        assert_eq!(value["metrics"]["rougeL"], 0.5);
        assert_eq!(value["metrics"]["energy_J"], 2.0);
    }

    #[test]
    fn test_pareto_json_lists_frontier() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pareto.json");
        let trial = TrialResult {
            index: 0,
            config: PromptConfig::default(),
            summary: SummaryMetrics::default(),
        };
        let results = SearchResults {
            trials: vec![trial],
            pareto_indices: vec![0],
            recommended: Some(0),
        };
        write_pareto_json(&path, &results).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["trials"], 1);
        assert_eq!(value["recommended"]["trial"], 1);
        assert_eq!(value["frontier"].as_array().unwrap().len(), 1);
    }
}
