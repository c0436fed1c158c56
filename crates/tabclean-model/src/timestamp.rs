//! Run timestamps as they appear in artifact names.

use chrono::NaiveDateTime;

use crate::error::{ModelError, Result};

/// `strftime` format of run timestamps and standardized dates.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn format_run_timestamp(value: &NaiveDateTime) -> String {
    value.format(RUN_TIMESTAMP_FORMAT).to_string()
}

/// Parse a `YYYYMMDD_HHMMSS` stamp.
pub fn parse_run_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, RUN_TIMESTAMP_FORMAT).map_err(|_| {
        ModelError::InvalidTimestamp {
            value: value.to_string(),
            format: RUN_TIMESTAMP_FORMAT,
        }
    })
}
