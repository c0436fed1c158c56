//! Tax / national identifier standardization.

use polars::prelude::DataFrame;
use tabclean_common::{column_optional_strings, replace_string_column};
use tabclean_model::{ColumnSelection, TypeKind};
use tracing::debug;

use crate::StandardizeOutcome;
use crate::error::Result;
use crate::selection::resolve_selection;

/// Normalize an identifier; a missing or blank value becomes `"0"`.
///
/// The value is trimmed and lower-cased, cut at the first `.` and then at the
/// first `,`, and every non-word character is replaced by `0`.
pub fn standardize_national_id(value: Option<&str>) -> String {
    let mut id = match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_lowercase(),
        _ => return "0".to_string(),
    };
    if let Some(pos) = id.find('.') {
        id.truncate(pos);
    }
    if let Some(pos) = id.find(',') {
        id.truncate(pos);
    }
    let id: String = id
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '0' })
        .collect();
    id.replace("nan", "0")
}

pub fn standardize_national_ids(
    df: &mut DataFrame,
    selection: &ColumnSelection,
) -> Result<StandardizeOutcome> {
    let columns = resolve_selection(df, selection, TypeKind::NationalId)?;
    for column in &columns {
        debug!(column = %column, "standardizing national ids");
        let values: Vec<String> = column_optional_strings(df, column)?
            .iter()
            .map(|value| standardize_national_id(value.as_deref()))
            .collect();
        replace_string_column(df, column, values)?;
    }
    Ok(StandardizeOutcome::new(TypeKind::NationalId, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_and_replaces_non_word_characters() {
        assert_eq!(standardize_national_id(Some(" AB-12.34 ")), "ab012");
        assert_eq!(standardize_national_id(Some("123,45")), "123");
        assert_eq!(standardize_national_id(Some("PT 500 100")), "pt05000100");
    }

    #[test]
    fn test_missing_blank_and_nan() {
        assert_eq!(standardize_national_id(None), "0");
        assert_eq!(standardize_national_id(Some("NaN")), "0");
        assert_eq!(standardize_national_id(Some("")), "0");
        assert_eq!(standardize_national_id(Some("   ")), "0");
    }
}
