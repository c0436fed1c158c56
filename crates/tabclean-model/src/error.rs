//! Model error types.

use thiserror::Error;

/// Errors raised while building model values from configuration text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Refresh cadence string could not be parsed.
    #[error("invalid refresh cadence '{value}': {reason}")]
    InvalidCadence { value: String, reason: String },

    /// Decimal separator is neither `,` nor `.`.
    #[error("invalid decimal separator '{value}'")]
    InvalidDecimal { value: String },

    /// Timestamp does not follow the run timestamp format.
    #[error("timestamp '{value}' must use the format {format}")]
    InvalidTimestamp { value: String, format: &'static str },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
