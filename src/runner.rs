//! Wires a [`Config`] to the built-in backend and runs one of the two modes.

use std::sync::Arc;

use tracing::info;

use crate::backend::{GuardedGenerator, LeadModel, ModelCard, Telemetry, VocabTokenizer};
use crate::config::Config;
use crate::dataset::{DatasetFile, RecordSource};
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::metrics::{EnergySampler, MonotonicClock};
use crate::models::{PromptConfig, SummaryMetrics};
use crate::output::{ensure_results_dir, write_pareto_json, write_summary_json, PerExampleCsv, TrialsCsv};
use crate::search::{run_search, SearchResults};

/// Tokenizer and serialized generator loaded from the configured paths.
pub struct Backend {
    pub tokenizer: VocabTokenizer,
    pub generator: GuardedGenerator,
}

impl Backend {
    pub fn load(config: &Config) -> Result<Self> {
        let tokenizer = VocabTokenizer::load(&config.tokenizer_path)?;
        let card = ModelCard::load(&config.model_path)?;
        let model = LeadModel::from_card(&card, &tokenizer)?;
        info!(
            tokenizer = %config.tokenizer_path.display(),
            vocab = tokenizer.len(),
            model = %config.model_path.display(),
            "backend loaded"
        );

        let generator = GuardedGenerator::new(Arc::new(model), config.generation.timeout());
        Ok(Self {
            tokenizer,
            generator,
        })
    }
}

fn acquire_telemetry(config: &Config) -> Telemetry {
    Telemetry::acquire(config.telemetry.power_path.as_deref(), config.telemetry.unit)
}

/// Evaluate mode: stream `eval_per_example.csv`, then write `summary.json`.
///
/// Returns the example count and the folded summary.
pub fn evaluate_dataset(config: &Config, prompt: &PromptConfig) -> Result<(usize, SummaryMetrics)> {
    let dataset = DatasetFile::new(&config.dataset_path);
    let records = dataset.records()?;

    ensure_results_dir(&config.results_dir)?;
    let backend = Backend::load(config)?;
    let telemetry = acquire_telemetry(config);
    let clock = MonotonicClock::new();
    let evaluator = Evaluator::new(
        &backend.tokenizer,
        &backend.generator,
        EnergySampler::new(telemetry.source(), &clock),
        config.generation.clone(),
    );

    let mut sink = PerExampleCsv::create(config.per_example_csv_path())?;
    let summary = evaluator.run_detailed(records, prompt, &mut sink)?;
    let examples = sink.rows();

    write_summary_json(&config.summary_json_path(), prompt, examples, &summary)?;
    info!(
        csv = %sink.path().display(),
        summary = %config.summary_json_path().display(),
        "evaluation results written"
    );
    Ok((examples, summary))
}

/// Search mode: stream `trials.csv`, then write `pareto.json`.
pub fn search_prompts(config: &Config, budget: usize) -> Result<SearchResults> {
    let dataset = DatasetFile::new(&config.dataset_path);
    // Surface a missing dataset before any output is created.
    dataset.open()?;

    ensure_results_dir(&config.results_dir)?;
    let backend = Backend::load(config)?;
    let telemetry = acquire_telemetry(config);
    let clock = MonotonicClock::new();
    let evaluator = Evaluator::new(
        &backend.tokenizer,
        &backend.generator,
        EnergySampler::new(telemetry.source(), &clock),
        config.generation.clone(),
    );

    let mut sink = TrialsCsv::create(config.trials_csv_path())?;
    let results = run_search(&config.prompt_space, budget, &dataset, &evaluator, &mut sink)?;

    write_pareto_json(&config.pareto_json_path(), &results)?;
    info!(
        csv = %sink.path().display(),
        pareto = %config.pareto_json_path().display(),
        "search results written"
    );
    Ok(results)
}
