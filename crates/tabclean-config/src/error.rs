//! Configuration error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// One shape problem found while resolving a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key, e.g. `data_types.date_cols.cols`.
    pub location: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Errors raised while loading or resolving a source configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not a valid source document.
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but its content has the wrong shape.
    #[error("invalid configuration ({} issue(s)): {}", issues.len(), join_issues(issues))]
    Invalid { issues: Vec<ConfigIssue> },
}

impl ConfigError {
    pub fn single(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            issues: vec![ConfigIssue::new(location, message)],
        }
    }

    /// Issues carried by an `Invalid` error; empty for the other variants.
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            Self::Invalid { issues } => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
