use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// EAPO: measure and search the quality / latency / energy trade-off of
/// summarization prompt styles.
#[derive(Parser, Debug)]
#[command(name = "eapo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config JSON file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Operation mode.
    #[arg(short, long, value_enum)]
    pub mode: Mode,

    /// Prompt config JSON for evaluate mode, e.g. '{"style":"concise","brevity":"1sent"}'.
    #[arg(short, long, required_if_eq("mode", "evaluate"))]
    pub prompt: Option<String>,

    /// Number of grid-search trials.
    #[arg(short, long, default_value_t = 10)]
    pub trials: usize,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Grid-search the prompt space, one summary row per trial.
    Search,
    /// Evaluate one prompt config, one row per dataset example.
    Evaluate,
}
