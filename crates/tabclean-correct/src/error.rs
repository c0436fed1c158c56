//! Row correction error types.
//!
//! Malformed rows are not errors: they are logged and counted in
//! [`crate::CorrectionReport`]. These variants stop the correction.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrectError {
    /// The corrector cannot run with these settings.
    #[error("invalid corrector settings: {reason}")]
    InvalidSettings { reason: String },

    /// The source had no header line.
    #[error("source has no lines to correct")]
    EmptySource,

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Result type for row correction.
pub type Result<T> = std::result::Result<T, CorrectError>;
