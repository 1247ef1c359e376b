// src/error.rs

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PulseError>;

/// Failures raised while building a pulse.
///
/// `MalformedRow` and `SentimentScoring` are row-level: the pipeline counts
/// them and keeps going. Everything else aborts the run.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("failed to read input {}: {reason}", .path.display())]
    InputRead { path: PathBuf, reason: String },

    #[error("input {} has no `{column}` column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("malformed row {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("sentiment scoring failed: {0}")]
    SentimentScoring(String),

    #[error("failed to write output {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl PulseError {
    /// Row-level errors are recovered inside the batch.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            PulseError::MalformedRow { .. } | PulseError::SentimentScoring(_)
        )
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        PulseError::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_level_classification() {
        let row = PulseError::MalformedRow {
            line: 3,
            reason: "bad date".into(),
        };
        assert!(row.is_row_level());
        assert!(PulseError::SentimentScoring("boom".into()).is_row_level());

        let fatal = PulseError::InputNotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert!(!fatal.is_row_level());
        assert_eq!(fatal.to_string(), "input file not found: missing.csv");
    }
}
