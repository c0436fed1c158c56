//! Integer standardization.

use polars::prelude::{DataFrame, NamedFrom, Series};
use tabclean_common::column_strings;
use tabclean_model::{ColumnSelection, TypeKind};
use tracing::debug;

use crate::StandardizeOutcome;
use crate::error::Result;
use crate::selection::resolve_selection;

/// Parse a locale-formatted integer, degrading anything else to 0.
///
/// Commas are grouping marks. Two or more periods are grouping marks too; a
/// single period starts a fraction, which is truncated.
pub fn standardize_integer(value: &str) -> i64 {
    let compact: String = value.chars().filter(|c| *c != ' ' && *c != ',').collect();
    let digits = match compact.matches('.').count() {
        0 => compact.as_str(),
        1 => compact.split('.').next().unwrap_or_default(),
        _ => return parse_digits(&compact.replace('.', "")),
    };
    parse_digits(digits)
}

fn parse_digits(digits: &str) -> i64 {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    digits.parse().unwrap_or(0)
}

/// Replace the selected columns with `Int64` columns.
pub fn standardize_integers(
    df: &mut DataFrame,
    selection: &ColumnSelection,
) -> Result<StandardizeOutcome> {
    let columns = resolve_selection(df, selection, TypeKind::Integer)?;
    for column in &columns {
        debug!(column = %column, "standardizing integers");
        let values: Vec<i64> = column_strings(df, column)?
            .iter()
            .map(|value| standardize_integer(value))
            .collect();
        df.with_column(Series::new(column.as_str().into(), values))?;
    }
    Ok(StandardizeOutcome::new(TypeKind::Integer, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_marks_are_discarded() {
        assert_eq!(standardize_integer("1.234.567"), 1_234_567);
        assert_eq!(standardize_integer("12,5"), 125);
        assert_eq!(standardize_integer("1 000"), 1000);
    }

    #[test]
    fn test_single_period_truncates() {
        assert_eq!(standardize_integer("12.9"), 12);
        assert_eq!(standardize_integer(".5"), 0);
    }

    #[test]
    fn test_invalid_values_become_zero() {
        assert_eq!(standardize_integer("abc"), 0);
        assert_eq!(standardize_integer(""), 0);
        assert_eq!(standardize_integer("-5"), 0);
        assert_eq!(standardize_integer("99999999999999999999"), 0);
    }
}
