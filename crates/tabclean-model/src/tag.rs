//! Configuration type tags and the closed set of standardizer kinds.
//!
//! A source document declares its columns under a fixed set of keys in the
//! `data_types` section (`str_cols`, `date_cols`, ...). [`TypeTag`] names those
//! keys; [`TypeKind`] names the standardizer a tag dispatches to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recognized key of the `data_types` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// Final header names (`names`).
    Names,
    /// Client numbers, standardized as integers (`n_client_cols`).
    NClientCols,
    /// Free text identifiers (`str_cols`).
    StrCols,
    /// Integers (`int_cols`).
    IntCols,
    /// Tax / national identifiers (`nif_cols`).
    NifCols,
    /// Decimal amounts (`float_cols`).
    FloatCols,
    /// Contact columns. Declared for coverage only.
    ContactCols,
    /// Dates (`date_cols`). Carries format metadata next to its `cols` key.
    DateCols,
    /// Macro header tags of a multilevel spreadsheet.
    MacroTagsNames,
    /// Micro tags paired with the macro header tags.
    MicroTagsNames,
}

impl TypeTag {
    /// Every tag whose value is a column list, in declaration order.
    pub const COLUMN_LISTS: [TypeTag; 10] = [
        Self::Names,
        Self::NClientCols,
        Self::StrCols,
        Self::IntCols,
        Self::NifCols,
        Self::FloatCols,
        Self::ContactCols,
        Self::MacroTagsNames,
        Self::MicroTagsNames,
        Self::DateCols,
    ];

    /// Tags eligible for wildcard expansion against the dataset header.
    pub const EXPANDABLE: [TypeTag; 8] = [
        Self::Names,
        Self::NClientCols,
        Self::StrCols,
        Self::IntCols,
        Self::NifCols,
        Self::FloatCols,
        Self::ContactCols,
        Self::DateCols,
    ];

    /// Tags every source is expected to declare; used by the coverage audit.
    pub const COVERAGE: [TypeTag; 7] = [
        Self::NClientCols,
        Self::StrCols,
        Self::IntCols,
        Self::NifCols,
        Self::FloatCols,
        Self::ContactCols,
        Self::DateCols,
    ];

    /// The configuration key for this tag.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Names => "names",
            Self::NClientCols => "n_client_cols",
            Self::StrCols => "str_cols",
            Self::IntCols => "int_cols",
            Self::NifCols => "nif_cols",
            Self::FloatCols => "float_cols",
            Self::ContactCols => "contact_cols",
            Self::DateCols => "date_cols",
            Self::MacroTagsNames => "macro_tags_names",
            Self::MicroTagsNames => "micro_tags_names",
        }
    }

    /// The standardizer this tag dispatches to, if any.
    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            Self::Names => Some(TypeKind::Rename),
            Self::NClientCols | Self::IntCols => Some(TypeKind::Integer),
            Self::StrCols => Some(TypeKind::String),
            Self::NifCols => Some(TypeKind::NationalId),
            Self::FloatCols => Some(TypeKind::Float),
            Self::DateCols => Some(TypeKind::Date),
            Self::ContactCols | Self::MacroTagsNames | Self::MicroTagsNames => None,
        }
    }

    /// Whether the tag's value is a section with a nested `cols` key.
    pub fn is_sectioned(&self) -> bool {
        matches!(self, Self::DateCols)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::COLUMN_LISTS
            .into_iter()
            .find(|tag| tag.key() == s.trim())
            .ok_or_else(|| format!("Unknown type tag: {s}"))
    }
}

/// Semantic column type handled by one standardizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    String,
    Integer,
    Float,
    NationalId,
    Date,
    Rename,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::NationalId => "nationalId",
            Self::Date => "date",
            Self::Rename => "rename",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
