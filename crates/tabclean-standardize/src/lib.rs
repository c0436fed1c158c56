//! Per-type column standardizers.
//!
//! Each standardizer rewrites a set of dataset columns in place with fixed
//! heuristic rules:
//!
//! - **string**: compact lower-case identifiers
//! - **integer**: locale-formatted integers, `0` when unreadable
//! - **float**: locale-formatted decimals with a column-wide separator convention
//! - **nationalId**: tax identifiers with non-word characters replaced by `0`
//! - **date**: `strftime` parsing to `YYYYMMDD_HHMMSS`
//! - **rename**: positional header rewrite
//!
//! [`apply_directive`] dispatches a resolved directive to its standardizer.

mod date;
mod dispatch;
mod error;
mod float;
mod integer;
mod national_id;
mod rename;
mod selection;
mod string;

use tabclean_model::TypeKind;

pub use date::{parse_with_format, standardize_date_value, standardize_dates};
pub use dispatch::apply_directive;
pub use error::{Result, StandardizeError};
pub use float::{FloatColumn, standardize_float_values, standardize_floats};
pub use integer::{standardize_integer, standardize_integers};
pub use national_id::{standardize_national_id, standardize_national_ids};
pub use rename::{rename_dataset_columns, standardize_column_name};
pub use selection::resolve_selection;
pub use string::{standardize_string, standardize_strings};

/// What a standardizer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardizeOutcome {
    pub kind: TypeKind,
    /// Columns processed (for rename, the new header).
    pub columns: Vec<String>,
    /// Values degraded to the kind's fallback because they could not be parsed.
    pub parse_errors: usize,
}

impl StandardizeOutcome {
    pub fn new(kind: TypeKind, columns: Vec<String>) -> Self {
        Self {
            kind,
            columns,
            parse_errors: 0,
        }
    }
}
