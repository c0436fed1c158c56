//! Decimal standardization of locale-formatted numbers.
//!
//! Values arrive as text written with either `.` or `,` as the decimal mark and
//! the other as a thousands separator. The convention is first inferred for the
//! whole column from literal mark counts, then each value is parsed.
//!
//! Blank cells and cells that cannot be read become `-1` while parsing; every
//! `-1` is written out as `0`.

use polars::prelude::{DataFrame, NamedFrom, Series};
use tabclean_common::column_optional_strings;
use tabclean_model::{ColumnSelection, DecimalSeparator, TypeKind};
use tracing::{debug, warn};

use crate::StandardizeOutcome;
use crate::error::Result;
use crate::selection::resolve_selection;

const SENTINEL: f64 = -1.0;

/// Parsed values of one column and the number of unreadable cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatColumn {
    pub values: Vec<f64>,
    pub parse_errors: usize,
}

/// Standardize the text cells of one column.
pub fn standardize_float_values(
    values: &[Option<String>],
    decimal: Option<DecimalSeparator>,
) -> FloatColumn {
    let mut texts: Vec<String> = values
        .iter()
        .map(|value| match value.as_deref() {
            None => "-1".to_string(),
            Some(text) if text.trim().is_empty() || text == "." => "-1".to_string(),
            Some(text) => text.to_string(),
        })
        .collect();

    strip_thousands_marks(&mut texts, decimal);
    if texts.iter().any(|text| text.contains('%')) {
        for text in &mut texts {
            *text = text.replace('%', "");
        }
    }

    let mut parse_errors = 0;
    let values = texts
        .iter()
        .map(|text| {
            let parsed = parse_float_token(text).unwrap_or_else(|| {
                parse_errors += 1;
                SENTINEL
            });
            if parsed == SENTINEL { 0.0 } else { parsed }
        })
        .collect();

    FloatColumn {
        values,
        parse_errors,
    }
}

fn count(text: &str, mark: char) -> usize {
    text.matches(mark).count()
}

/// Remove thousands separators according to the column-wide convention.
fn strip_thousands_marks(texts: &mut [String], decimal: Option<DecimalSeparator>) {
    let many_periods = texts.iter().any(|text| count(text, '.') > 1);
    let one_period = texts.iter().any(|text| count(text, '.') == 1);
    let many_commas = texts.iter().any(|text| count(text, ',') > 1);
    let one_comma = texts.iter().any(|text| count(text, ',') == 1);

    if many_periods {
        remove_everywhere(texts, '.');
    } else if one_period && decimal == Some(DecimalSeparator::Comma) {
        remove_long_groups(texts, '.');
    } else if many_commas {
        remove_everywhere(texts, ',');
    } else if one_comma && decimal == Some(DecimalSeparator::Period) {
        remove_long_groups(texts, ',');
    }
}

fn remove_everywhere(texts: &mut [String], mark: char) {
    for text in texts {
        *text = text.replace(mark, "");
    }
}

/// A mark followed by more than two characters before the next mark is a
/// thousands separator.
fn remove_long_groups(texts: &mut [String], mark: char) {
    for text in texts {
        let after_mark = text.split(mark).nth(1).map(|group| group.chars().count());
        let is_thousands = text.find(mark).is_some_and(|pos| pos > 0)
            && after_mark.is_some_and(|len| len > 2);
        if is_thousands {
            *text = text.replace(mark, "");
        }
    }
}

/// Parse one token after the column-wide pass. `None` is a parse error.
fn parse_float_token(text: &str) -> Option<f64> {
    let comma_groups: Vec<&str> = text.split(',').collect();
    let period_groups = text.split('.').count();
    let has_period = text.contains('.');
    let has_comma = text.contains(',');

    if comma_groups.len() == 2 && !has_period {
        return parse(&text.replace(',', "."));
    }
    if period_groups == 2 && !has_comma {
        return parse(text);
    }
    if period_groups > 2 {
        return parse(&text.replace('.', "").replace(',', "."));
    }
    if let Some((last, head)) = comma_groups.split_last()
        && !head.is_empty()
        && last.chars().count() == 2
        && text.find('.').is_some_and(|pos| pos > 0)
    {
        let integer: String = head.iter().map(|group| group.replace('.', "")).collect();
        return parse(&format!("{integer}.{last}"));
    }
    if text.find(':').is_some_and(|pos| pos > 0) {
        return Some(SENTINEL);
    }
    parse(text)
}

fn parse(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Replace the selected columns with `Float64` columns.
pub fn standardize_floats(
    df: &mut DataFrame,
    selection: &ColumnSelection,
    decimal: Option<DecimalSeparator>,
) -> Result<StandardizeOutcome> {
    let columns = resolve_selection(df, selection, TypeKind::Float)?;
    let mut outcome = StandardizeOutcome::new(TypeKind::Float, columns.clone());
    for column in &columns {
        debug!(column = %column, decimal = ?decimal, "standardizing floats");
        let parsed = standardize_float_values(&column_optional_strings(df, column)?, decimal);
        if parsed.parse_errors > 0 {
            warn!(
                column = %column,
                count = parsed.parse_errors,
                "unparseable decimal values set to 0"
            );
        }
        outcome.parse_errors += parsed.parse_errors;
        df.with_column(Series::new(column.as_str().into(), parsed.values))?;
    }
    Ok(outcome)
}
