use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EapoError {
    #[error("Config error in {}: {}", .path.display(), .message)]
    Config { path: PathBuf, message: String },

    #[error("Dataset error in {}{}: {}", .path.display(), line_suffix(.line), .message)]
    Dataset {
        path: PathBuf,
        /// 1-based line number, 0 when the file itself is at fault.
        line: usize,
        message: String,
    },

    #[error("Cannot write {}: {}", .path.display(), .source)]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{component} call failed: {message}")]
    External {
        component: &'static str,
        message: String,
    },

    #[error("{component} call timed out after {seconds:.1}s")]
    Timeout {
        component: &'static str,
        seconds: f64,
    },

    #[error("Invalid prompt configuration: {0}")]
    InvalidPrompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EapoError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        EapoError::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn external(component: &'static str, message: impl Into<String>) -> Self {
        EapoError::External {
            component,
            message: message.into(),
        }
    }

    pub fn dataset(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        EapoError::Dataset {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EapoError::Output {
            path: path.into(),
            source,
        }
    }
}

fn line_suffix(line: &usize) -> String {
    if *line > 0 {
        format!(" line {}", line)
    } else {
        String::new()
    }
}

pub type Result<T> = std::result::Result<T, EapoError>;
