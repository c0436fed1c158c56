//! Column directives produced by configuration resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::tag::{TypeKind, TypeTag};

/// Split a normalized comma-joined column string into names.
///
/// Newlines are removed and every token is trimmed. Empty tokens are skipped.
pub fn split_column_list(value: &str) -> Vec<String> {
    value
        .replace('\n', "")
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// The columns a directive applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub names: Vec<String>,
    /// When set, columns absent from the dataset are skipped with a warning
    /// instead of failing the run.
    pub optional: bool,
}

impl ColumnSelection {
    pub fn new(names: Vec<String>, optional: bool) -> Self {
        Self { names, optional }
    }

    /// Build a selection from a comma-joined column string.
    pub fn parse(list: &str, optional: bool) -> Self {
        Self::new(split_column_list(list), optional)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Decimal mark of a locale-formatted number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecimalSeparator {
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ".")]
    Period,
}

impl DecimalSeparator {
    pub fn as_char(&self) -> char {
        match self {
            Self::Comma => ',',
            Self::Period => '.',
        }
    }
}

impl FromStr for DecimalSeparator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "," => Ok(Self::Comma),
            "." => Ok(Self::Period),
            other => Err(ModelError::InvalidDecimal {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Format policy of the date standardizer.
///
/// Per-column formats win over `other_formats`, which wins over the `mix`
/// candidates, which win over `global_format`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOptions {
    pub global_format: Option<String>,
    pub other_formats: Option<String>,
    pub mix: Vec<String>,
    pub column_formats: BTreeMap<String, String>,
}

/// The format(s) a date column is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormatChoice<'a> {
    Single(&'a str),
    /// Try each in order, first successful parse wins.
    Candidates(&'a [String]),
    Missing,
}

impl DateOptions {
    /// Whether a general policy applies to columns without an override.
    pub fn has_general_policy(&self) -> bool {
        self.global_format.is_some() || self.other_formats.is_some() || !self.mix.is_empty()
    }

    pub fn format_for(&self, column: &str) -> DateFormatChoice<'_> {
        if let Some(format) = self.column_formats.get(column) {
            DateFormatChoice::Single(format)
        } else if let Some(format) = &self.other_formats {
            DateFormatChoice::Single(format)
        } else if !self.mix.is_empty() {
            DateFormatChoice::Candidates(&self.mix)
        } else if let Some(format) = &self.global_format {
            DateFormatChoice::Single(format)
        } else {
            DateFormatChoice::Missing
        }
    }
}

/// Header rewrite settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOptions {
    /// Replacement header. `None` standardizes the dataset's own names.
    pub names: Option<Vec<String>>,
    /// Apply the name standardization rules (`standardize_cols_names`).
    pub standardize: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            names: None,
            standardize: true,
        }
    }
}

/// Kind-specific directive options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectiveOptions {
    #[default]
    None,
    Float {
        decimal: Option<DecimalSeparator>,
    },
    Date(DateOptions),
    Rename(RenameOptions),
}

impl DirectiveOptions {
    /// Whether these options can drive a standardizer of `kind`.
    pub fn fits(&self, kind: TypeKind) -> bool {
        match (kind, self) {
            (TypeKind::String | TypeKind::Integer | TypeKind::NationalId, Self::None) => true,
            (TypeKind::Float, Self::Float { .. } | Self::None) => true,
            (TypeKind::Date, Self::Date(_)) => true,
            (TypeKind::Rename, Self::Rename(_)) => true,
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Float { .. } => "float",
            Self::Date(_) => "date",
            Self::Rename(_) => "rename",
        }
    }
}

/// One resolved standardization step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeDirective {
    pub kind: TypeKind,
    /// Configuration key the directive was planned from.
    pub tag: TypeTag,
    pub columns: ColumnSelection,
    pub options: DirectiveOptions,
}

impl ColumnTypeDirective {
    pub fn new(tag: TypeTag, kind: TypeKind, columns: ColumnSelection) -> Self {
        Self {
            kind,
            tag,
            columns,
            options: DirectiveOptions::None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DirectiveOptions) -> Self {
        self.options = options;
        self
    }
}
