//! Source-level settings shared by the corrector and the pseudonymizer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::directive::split_column_list;

/// An unparsed line of a delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Zero-based line number in the source file.
    pub index: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Field offsets used by the malformed-row corrector.
///
/// Offsets are zero-based and constant for one correction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPositions {
    pub email_position: usize,
    pub phone_position: usize,
    pub id_position: usize,
    pub name_position: usize,
    /// Comma-separated values allowed to follow the name field. When absent the
    /// trailing name merge is disabled.
    #[serde(default)]
    pub possible_content_after_name: Option<String>,
}

impl ContactPositions {
    pub fn content_after_name(&self) -> Option<Vec<String>> {
        self.possible_content_after_name
            .as_deref()
            .map(|value| value.split(',').map(str::to_string).collect())
    }
}

/// A column to pseudonymize and the key table it draws identifiers from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskColumn {
    pub column: String,
    pub key_table: String,
}

/// Pseudonymization settings of one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskSettings {
    /// Directory holding one `{key_table}.json` file per key set.
    pub references_path: PathBuf,
    pub columns: Vec<MaskColumn>,
}

impl MaskSettings {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|mask| mask.column.clone()).collect()
    }
}

/// Parse the multilevel tag lists (`macro_tags_names`, `micro_tags_names`).
pub fn parse_tag_list(value: &str) -> Vec<String> {
    split_column_list(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_positions_from_yaml() {
        let yaml = "email_position: 4\nphone_position: 3\nid_position: 0\nname_position: 1\npossible_content_after_name: PT,ES\n";
        let positions: ContactPositions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(positions.email_position, 4);
        assert_eq!(
            positions.content_after_name(),
            Some(vec!["PT".to_string(), "ES".to_string()])
        );
    }

    #[test]
    fn test_content_after_name_absent() {
        let yaml = "email_position: 4\nphone_position: 3\nid_position: 0\nname_position: 1\n";
        let positions: ContactPositions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(positions.content_after_name(), None);
    }
}
