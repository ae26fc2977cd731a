use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a report run.
///
/// Everything recoverable (unparseable durations, empty suites, run-mode
/// mismatches) degrades into the output data instead of surfacing here.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("results folder not found: {0}")]
    ResultsDirMissing(PathBuf),

    #[error("missing compare results: {0}.")]
    MissingCompare(String),

    #[error("cannot resolve operating system for host `{0}`; pass --os-name")]
    UnsupportedHostOs(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: malformed CSV: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ReportError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        ReportError::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        ReportError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
