//! Streaming CSV writers. Every row is flushed as soon as it is written so an
//! aborted run leaves the completed rows on disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use crate::error::{EapoError, Result};
use crate::evaluator::ExampleSink;
use crate::models::EvaluationResult;
use crate::search::{TrialResult, TrialSink};

pub const PER_EXAMPLE_HEADER: [&str; 8] = [
    "doc",
    "prompt",
    "generated",
    "rougeL",
    "energy_J",
    "latency_s",
    "tokens",
    "tpj",
];

pub const TRIALS_HEADER: [&str; 8] = [
    "style",
    "reasoning",
    "format",
    "brevity",
    "rougeL",
    "energy_J",
    "latency_s",
    "tpj",
];

/// Create the results directory (and parents) if needed.
pub fn ensure_results_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| EapoError::output(dir, e))
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| EapoError::output(path, e))
}

fn csv_to_output(path: &Path, err: csv::Error) -> EapoError {
    if !err.is_io_error() {
        return EapoError::Csv(err);
    }
    match err.into_kind() {
        csv::ErrorKind::Io(io) => EapoError::output(path, io),
        _ => EapoError::output(path, std::io::Error::other("CSV write failed")),
    }
}

/// `eval_per_example.csv`: `doc`, `prompt` and `generated` always quoted with
/// inner quotes doubled, numeric fields bare.
pub struct PerExampleCsv {
    path: PathBuf,
    file: File,
    rows: usize,
}

impl PerExampleCsv {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = create_file(&path)?;
        writeln!(file, "{}", PER_EXAMPLE_HEADER.join(",")).map_err(|e| EapoError::output(&path, e))?;
        Ok(Self {
            path,
            file,
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Text fields as one quoted CSV fragment, without the record terminator.
    fn quoted_text(&self, fields: [&str; 3]) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer
            .write_record(fields)
            .map_err(|e| csv_to_output(&self.path, e))?;
        let mut line = writer
            .into_inner()
            .map_err(|e| EapoError::output(&self.path, e.into_error()))?;
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        Ok(line)
    }
}

impl ExampleSink for PerExampleCsv {
    fn write_example(&mut self, result: &EvaluationResult) -> Result<()> {
        let mut line = self.quoted_text([
            result.doc.as_str(),
            result.prompt.as_str(),
            result.generated.as_str(),
        ])?;
        writeln!(
            line,
            ",{},{},{},{},{}",
            result.rouge_l,
            result.energy_j,
            result.latency_s,
            result.token_count,
            result.tokens_per_joule
        )
        .map_err(|e| EapoError::output(&self.path, e))?;

        self.file
            .write_all(&line)
            .and_then(|_| self.file.flush())
            .map_err(|e| EapoError::output(&self.path, e))?;
        self.rows += 1;
        Ok(())
    }
}

/// `trials.csv`: one unquoted summary row per trial.
pub struct TrialsCsv {
    path: PathBuf,
    writer: Writer<File>,
}

impl TrialsCsv {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = create_file(&path)?;
        let mut writer = Writer::from_writer(file);
        writer
            .write_record(TRIALS_HEADER)
            .map_err(|e| csv_to_output(&path, e))?;
        writer.flush().map_err(|e| EapoError::output(&path, e))?;
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrialSink for TrialsCsv {
    fn write_trial(&mut self, trial: &TrialResult) -> Result<()> {
        let [style, reasoning, format, brevity] = trial.config.values();
        self.writer
            .write_record([
                style.to_string(),
                reasoning.to_string(),
                format.to_string(),
                brevity.to_string(),
                trial.summary.avg_rouge_l.to_string(),
                trial.summary.total_energy_j.to_string(),
                trial.summary.total_latency_s.to_string(),
                trial.summary.tokens_per_joule.to_string(),
            ])
            .map_err(|e| csv_to_output(&self.path, e))?;
        self.writer
            .flush()
            .map_err(|e| EapoError::output(&self.path, e))?;
        Ok(())
    }
}
