//! Newline-delimited JSON dataset of `{"doc": ..., "ref": ...}` records.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{EapoError, Result};
use crate::models::DatasetRecord;

pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<DatasetRecord>> + 'a>;

/// A dataset that can be iterated from the start any number of times.
pub trait RecordSource {
    fn records(&self) -> Result<RecordIter<'_>>;
}

/// Dataset stored on disk. Every call to [`RecordSource::records`] re-opens
/// the file, so nothing beyond the current line is held in memory.
#[derive(Debug, Clone)]
pub struct DatasetFile {
    path: PathBuf,
}

impl DatasetFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn open(&self) -> Result<DatasetReader> {
        let file = File::open(&self.path)
            .map_err(|e| EapoError::dataset(&self.path, 0, format!("cannot open dataset: {}", e)))?;
        Ok(DatasetReader {
            path: self.path.clone(),
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }
}

impl RecordSource for DatasetFile {
    fn records(&self) -> Result<RecordIter<'_>> {
        Ok(Box::new(self.open()?))
    }
}

impl RecordSource for [DatasetRecord] {
    fn records(&self) -> Result<RecordIter<'_>> {
        Ok(Box::new(self.iter().cloned().map(Ok)))
    }
}

impl RecordSource for Vec<DatasetRecord> {
    fn records(&self) -> Result<RecordIter<'_>> {
        self.as_slice().records()
    }
}

/// Streams records in file order.
///
/// Whitespace-only lines are skipped. Any other line that is not a JSON
/// object with string `doc` and `ref` fields ends the iteration with an
/// error carrying the 1-based line number.
pub struct DatasetReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl Iterator for DatasetReader {
    type Item = Result<DatasetRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.lines.next()? {
                Ok(raw) => raw,
                Err(e) => {
                    self.line += 1;
                    return Some(Err(EapoError::dataset(&self.path, self.line, e.to_string())));
                }
            };
            self.line += 1;

            if raw.trim().is_empty() {
                warn!(path = %self.path.display(), line = self.line, "skipping blank dataset line");
                continue;
            }

            return Some(
                serde_json::from_str::<DatasetRecord>(&raw)
                    .map_err(|e| EapoError::dataset(&self.path, self.line, e.to_string())),
            );
        }
    }
}
