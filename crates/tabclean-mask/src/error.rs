//! Pseudonymization error types.
//!
//! Every variant is a storage failure and ends the run: a dataset must never
//! be written with identifiers that were not persisted.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaskError {
    /// File I/O error.
    #[error("Failed to {operation} key table storage: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key table file is not a JSON object of strings.
    #[error("Invalid key table: {path}")]
    InvalidKeyTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize key table")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to replace key table {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key table names become file names.
    #[error("invalid key table name '{name}'")]
    InvalidKeyTableName { name: String },

    #[error("column '{column}' to pseudonymize is not in the dataset")]
    ColumnNotFound { column: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Result type for pseudonymization.
pub type Result<T> = std::result::Result<T, MaskError>;
