pub mod report;
pub mod writers;

pub use writers::{ensure_results_dir, PerExampleCsv, TrialsCsv};
pub use report::{
    print_evaluation_summary, print_pareto_frontier, print_top_trials, write_pareto_json,
    write_summary_json,
};
