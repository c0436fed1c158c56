//! Output error types.
//!
//! Every variant is a storage failure that ends the run.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use tabclean_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// File system error.
    #[error("Failed to {operation}: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Artifact date filter is not `YYYYMMDD`.
    #[error("invalid date '{value}': expected YYYYMMDD")]
    InvalidDate { value: String },

    /// Artifact file name without a run timestamp.
    #[error("artifact {path} does not carry a run timestamp")]
    MissingTimestamp { path: PathBuf },

    #[error(transparent)]
    Timestamp(#[from] ModelError),

    #[error("invalid delimiter '{value}': expected a single ASCII character")]
    InvalidDelimiter { value: String },

    #[error("unsupported output encoding '{encoding}'")]
    UnsupportedEncoding { encoding: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
