//! Free-text identifier standardization.

use polars::prelude::DataFrame;
use tabclean_common::{column_strings, replace_string_column};
use tabclean_model::{ColumnSelection, TypeKind};
use tracing::debug;

use crate::StandardizeOutcome;
use crate::error::Result;
use crate::selection::resolve_selection;

/// Compact a free-text value into a lower-case identifier.
///
/// Spaces are removed, the literals `nan` and `none` are dropped and only
/// letters, digits and underscores are kept.
pub fn standardize_string(value: &str) -> String {
    value
        .replace(' ', "")
        .to_lowercase()
        .replace("nan", "")
        .replace("none", "")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Standardize the selected columns as strings. Nulls become empty strings.
pub fn standardize_strings(
    df: &mut DataFrame,
    selection: &ColumnSelection,
) -> Result<StandardizeOutcome> {
    let columns = resolve_selection(df, selection, TypeKind::String)?;
    for column in &columns {
        debug!(column = %column, "standardizing strings");
        let values: Vec<String> = column_strings(df, column)?
            .iter()
            .map(|value| standardize_string(value))
            .collect();
        replace_string_column(df, column, values)?;
    }
    Ok(StandardizeOutcome::new(TypeKind::String, columns))
}
