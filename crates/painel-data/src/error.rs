//! Error types for data operations.

use crate::source::SourceKind;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading, joining or slicing sales data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A source file is missing, unreadable, malformed, or its date column
    /// could not be parsed.
    #[error("Failed to load {kind} source from {}: {reason}", path.display())]
    Load {
        /// Which of the five sources failed
        kind: SourceKind,
        /// Resolved path of the source file
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A declared column is absent from a source.
    #[error("Schema error: {kind} source has no column '{column}'")]
    Schema {
        /// Source that was expected to carry the column
        kind: SourceKind,
        /// Column name as configured
        column: String,
    },

    /// A column required by a view is absent from the unified record set.
    #[error("Missing column in unified records: {0}")]
    MissingColumn(String),

    /// Month key is not of the form `YYYY-MM`.
    #[error("Invalid month key: {0}")]
    InvalidKey(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A load failure reported to several callers waiting on the same load.
    #[error("{0}")]
    Shared(Arc<DataError>),
}

impl DataError {
    /// Build a [`DataError::Load`] from any displayable cause.
    pub(crate) fn load(kind: SourceKind, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
