//! Standardization error types.
//!
//! Unparseable cell values are not errors: they degrade to a sentinel and are
//! counted in [`crate::StandardizeOutcome`]. The variants here abort the
//! directive.

use polars::prelude::PolarsError;
use tabclean_model::TypeKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StandardizeError {
    /// Directive options do not belong to the directive's kind.
    #[error("{kind} standardizer cannot run with {options} options")]
    TypeMismatch {
        kind: TypeKind,
        options: &'static str,
    },

    /// A non-optional column is missing from the dataset.
    #[error("column '{column}' required by the {kind} standardizer is not in the dataset")]
    ColumnNotFound { column: String, kind: TypeKind },

    /// Replacement header does not match the dataset width.
    #[error("expected {expected} column names, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// No format applies to a date column.
    #[error("no date format configured for column '{column}'")]
    MissingDateFormat { column: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Result type for standardization operations.
pub type Result<T> = std::result::Result<T, StandardizeError>;
