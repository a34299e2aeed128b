//! Error types for biascorr-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the biascorr-io crate.
///
/// Covers file-system failures, malformed JSON, unparseable timestamps and
/// validation problems found in a cell file before any correction runs.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a read or write failure from the file system.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps a (de)serialisation failure from serde_json.
    #[error("json error in {}: {reason}", path.display())]
    Json {
        /// File being parsed or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a timestamp is neither an ISO date nor an ISO date-time.
    #[error("invalid time '{value}' in cell '{cell}': {reason}")]
    InvalidTime {
        /// Identifier of the offending cell.
        cell: String,
        /// The text that failed to parse.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound { path }
        } else {
            IoError::Io {
                path,
                reason: err.to_string(),
            }
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        IoError::Json {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
