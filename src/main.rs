use clap::Parser;

use eapo::cli::{Cli, Mode};
use eapo::config::Config;
use eapo::error::{EapoError, Result};
use eapo::logging;
use eapo::output::{print_evaluation_summary, print_pareto_frontier, print_top_trials};
use eapo::prompts::parse_prompt_config;
use eapo::runner::{evaluate_dataset, search_prompts};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    match cli.mode {
        Mode::Search => cmd_search(&config, cli.trials),
        Mode::Evaluate => {
            let prompt_json = cli.prompt.as_deref().ok_or_else(|| {
                EapoError::InvalidPrompt("--prompt is required in evaluate mode".to_string())
            })?;
            cmd_evaluate(&config, prompt_json)
        }
    }
}

/// Grid-search the configured prompt space.
fn cmd_search(config: &Config, trials: usize) -> Result<()> {
    println!("[Search] Running {} trials...", trials);

    let results = search_prompts(config, trials)?;

    print_top_trials(&results, 5);
    print_pareto_frontier(&results);

    println!(
        "Search complete. Results in {}",
        config.trials_csv_path().display()
    );
    Ok(())
}

/// Evaluate one prompt configuration over the whole dataset.
fn cmd_evaluate(config: &Config, prompt_json: &str) -> Result<()> {
    let prompt = parse_prompt_config(prompt_json)?;
    println!("[Evaluate] Prompt {}", prompt.display());

    let (examples, summary) = evaluate_dataset(config, &prompt)?;

    print_evaluation_summary(&prompt, examples, &summary);
    println!(
        "Wrote per-example results to {}",
        config.per_example_csv_path().display()
    );
    Ok(())
}
