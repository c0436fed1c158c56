//! Date standardization to `YYYYMMDD_HHMMSS`.
//!
//! Formats are `strftime` patterns. Two trailing markers change how the value
//! is read: a format ending in `.` cuts the value at its first `.` (fractional
//! seconds), a format ending in `0` cuts it at its first space (a time part
//! to ignore). The marker itself is not part of the pattern.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::DataFrame;
use tabclean_common::{column_optional_strings, replace_string_column};
use tabclean_model::{
    ColumnSelection, DateFormatChoice, DateOptions, RUN_TIMESTAMP_FORMAT, TypeKind,
};
use tracing::{debug, warn};

use crate::StandardizeOutcome;
use crate::error::{Result, StandardizeError};
use crate::selection::resolve_selection;

/// Values shorter than this are treated as empty.
const MIN_DATE_LEN: usize = 4;

/// Parse `value` with a single format, honouring the trailing markers.
///
/// Date-only formats yield midnight; formats without a day (or without month
/// and day) default the missing components to 1.
pub fn parse_with_format(value: &str, format: &str) -> Option<NaiveDateTime> {
    let (value, format) = if let Some(format) = format.strip_suffix('.') {
        (value.split('.').next().unwrap_or_default(), format)
    } else if let Some(format) = format.strip_suffix('0') {
        (value.split(' ').next().unwrap_or_default(), format)
    } else {
        (value, format)
    };

    NaiveDateTime::parse_from_str(value, format)
        .or_else(|_| NaiveDateTime::parse_from_str(&format!("{value} 0"), &format!("{format} %M")))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .or_else(|_| NaiveDate::parse_from_str(&format!("{value} 1"), &format!("{format} %d")))
                .or_else(|_| {
                    NaiveDate::parse_from_str(&format!("{value} 1 1"), &format!("{format} %m %d"))
                })
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Standardize one value. `Ok(None)` means the value could not be parsed.
///
/// Empty values and `NaT` are returned unchanged.
pub fn standardize_date_value(value: &str, choice: DateFormatChoice<'_>) -> Option<String> {
    if value.is_empty() || value == "NaT" {
        return Some(value.to_string());
    }
    let parsed = match choice {
        DateFormatChoice::Single(format) => parse_with_format(value, format),
        DateFormatChoice::Candidates(formats) => formats
            .iter()
            .find_map(|format| parse_with_format(value, format)),
        DateFormatChoice::Missing => None,
    };
    parsed.map(|date| date.format(RUN_TIMESTAMP_FORMAT).to_string())
}

pub fn standardize_dates(
    df: &mut DataFrame,
    selection: &ColumnSelection,
    options: &DateOptions,
) -> Result<StandardizeOutcome> {
    let columns = resolve_selection(df, selection, TypeKind::Date)?;
    let mut outcome = StandardizeOutcome::new(TypeKind::Date, columns.clone());

    for column in &columns {
        let choice = options.format_for(column);
        if choice == DateFormatChoice::Missing {
            return Err(StandardizeError::MissingDateFormat {
                column: column.clone(),
            });
        }
        debug!(column = %column, format = ?choice, "standardizing dates");

        let mut failures = 0;
        let values: Vec<String> = column_optional_strings(df, column)?
            .into_iter()
            .map(|value| {
                let value = value.unwrap_or_default();
                if value.chars().count() < MIN_DATE_LEN {
                    return String::new();
                }
                standardize_date_value(&value, choice).unwrap_or_else(|| {
                    failures += 1;
                    String::new()
                })
            })
            .collect();

        if failures > 0 {
            warn!(column = %column, count = failures, "unparseable dates left empty");
        }
        outcome.parse_errors += failures;
        replace_string_column(df, column, values)?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(value: &str, format: &str) -> Option<String> {
        standardize_date_value(value, DateFormatChoice::Single(format))
    }

    #[test]
    fn test_date_only_format_yields_midnight() {
        assert_eq!(single("2023-05-01", "%Y-%m-%d").as_deref(), Some("20230501_000000"));
    }

    #[test]
    fn test_datetime_formats() {
        assert_eq!(
            single("01/05/2023 13:45:10", "%d/%m/%Y %H:%M:%S").as_deref(),
            Some("20230501_134510")
        );
        assert_eq!(
            single("2023-05-01 13", "%Y-%m-%d %H").as_deref(),
            Some("20230501_130000")
        );
    }

    #[test]
    fn test_missing_day_and_month_default_to_one() {
        assert_eq!(single("2023-05", "%Y-%m").as_deref(), Some("20230501_000000"));
        assert_eq!(single("2023", "%Y").as_deref(), Some("20230101_000000"));
    }

    #[test]
    fn test_trailing_markers() {
        assert_eq!(
            single("2023-05-01 10:00:00.123", "%Y-%m-%d %H:%M:%S.").as_deref(),
            Some("20230501_100000")
        );
        assert_eq!(
            single("2023-05-01 10:00:00", "%Y-%m-%d0").as_deref(),
            Some("20230501_000000")
        );
    }

    #[test]
    fn test_candidates_first_success_wins() {
        let formats = vec!["%Y-%m-%d".to_string(), "%d/%m/%Y".to_string()];
        assert_eq!(
            standardize_date_value("02/03/2024", DateFormatChoice::Candidates(&formats)).as_deref(),
            Some("20240302_000000")
        );
    }

    #[test]
    fn test_empty_nat_and_failures() {
        assert_eq!(single("", "%Y").as_deref(), Some(""));
        assert_eq!(single("NaT", "%Y").as_deref(), Some("NaT"));
        assert_eq!(single("not a date", "%Y-%m-%d"), None);
    }
}
