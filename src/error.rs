//! Error type shared by every stage of the chart pipeline.

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Failures that abort a chart run.
///
/// There is no partial output: the first error from loading, deriving or
/// rendering is surfaced to the caller and the run stops.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A log file could not be read, or a row is malformed.
    #[error("parse error in {path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        /// 1-based line number (0 when the failure is not tied to a line).
        line: usize,
        reason: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A degenerate record whose normalizing denominator is zero.
    #[error("division by zero while deriving {field} for record {index}")]
    DivisionByZero { field: &'static str, index: usize },

    #[error("variant '{0}' is not part of this legend scope")]
    UnknownVariant(String),

    #[error("variant '{0}' appears more than once in one legend scope")]
    DuplicateVariant(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("rendering {path} failed: {reason}")]
    Render { path: PathBuf, reason: String },
}

impl ChartError {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        ChartError::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn render(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ChartError::Render {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
