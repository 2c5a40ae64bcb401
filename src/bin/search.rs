use std::path::PathBuf;

use clap::Parser;

use eapo::config::Config;
use eapo::logging;
use eapo::output::{print_pareto_frontier, print_top_trials};
use eapo::runner::search_prompts;

#[derive(Parser, Debug)]
#[command(name = "eapo_search")]
#[command(about = "Grid-search the prompt space using num_trials from the config")]
struct Args {
    /// Path to the config JSON file
    config: PathBuf,

    /// Number of top trials to display
    #[arg(long, default_value = "5")]
    topk: usize,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Grid size {} configurations, budget {} trials",
        config.prompt_space.size(),
        config.num_trials
    );

    let results = match search_prompts(&config, config.num_trials) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    print_top_trials(&results, args.topk);
    print_pareto_frontier(&results);

    println!(
        "Search complete. Results in {}",
        config.trials_csv_path().display()
    );
}
