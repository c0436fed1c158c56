//! Refresh cadence and the reprocessing decision.
//!
//! A source declares how often it should be rebuilt (`refresh_rate: "day,1"`).
//! Before loading anything the pipeline compares the timestamp of the last
//! artifact with the current run time.
//!
//! Differences are counted in whole calendar units: a gap of 1 day and 23 hours
//! is 1 day, 47 hours, 0 weeks. Reprocessing happens only when the difference is
//! strictly greater than the configured count.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Unit of a refresh cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CadenceUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    /// No cadence: every run reprocesses.
    None,
}

impl CadenceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::None => "none",
        }
    }
}

impl FromStr for CadenceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "unit must be one of year, month, week, day, hour, none (got '{}')",
                s.trim()
            )),
        }
    }
}

impl fmt::Display for CadenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `"{unit},{count}"` refresh cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub unit: CadenceUnit,
    pub count: u32,
}

impl Cadence {
    /// A cadence that always reprocesses.
    pub const NONE: Cadence = Cadence {
        unit: CadenceUnit::None,
        count: 0,
    };

    pub fn new(unit: CadenceUnit, count: u32) -> Self {
        Self { unit, count }
    }

    pub fn decide(&self, last: NaiveDateTime, now: NaiveDateTime) -> FreshnessDecision {
        FreshnessDecision {
            should_reprocess: should_reprocess(last, now, self.unit, self.count),
        }
    }
}

impl FromStr for Cadence {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ModelError::InvalidCadence {
            value: s.to_string(),
            reason,
        };
        let mut parts = s.split(',');
        let unit: CadenceUnit = parts
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(invalid)?;
        let count = match parts.next() {
            Some(count) => count
                .trim()
                .parse::<u32>()
                .map_err(|err| invalid(format!("count: {err}")))?,
            None if unit == CadenceUnit::None => 0,
            None => return Err(invalid("missing count".to_string())),
        };
        if parts.next().is_some() {
            return Err(invalid("expected '{unit},{count}'".to_string()));
        }
        Ok(Self { unit, count })
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.unit, self.count)
    }
}

/// Outcome of the freshness gate for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessDecision {
    pub should_reprocess: bool,
}

/// Whether a source last produced at `last` must be rebuilt at `now`.
pub fn should_reprocess(last: NaiveDateTime, now: NaiveDateTime, unit: CadenceUnit, count: u32) -> bool {
    let elapsed = match unit {
        CadenceUnit::None => return true,
        CadenceUnit::Hour => (now - last).num_hours(),
        CadenceUnit::Day => (now - last).num_days(),
        CadenceUnit::Week => (now - last).num_weeks(),
        CadenceUnit::Month => whole_months(last, now),
        CadenceUnit::Year => whole_months(last, now) / 12,
    };
    elapsed > i64::from(count)
}

fn whole_months(last: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let mut months = i64::from(now.year() - last.year()) * 12 + i64::from(now.month())
        - i64::from(last.month());
    let now_rest = (now.day(), now.num_seconds_from_midnight(), now.nanosecond());
    let last_rest = (last.day(), last.num_seconds_from_midnight(), last.nanosecond());
    if months > 0 && now_rest < last_rest {
        months -= 1;
    } else if months < 0 && now_rest > last_rest {
        months += 1;
    }
    months
}
