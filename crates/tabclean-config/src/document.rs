//! Typed tree of a per-source YAML document.
//!
//! Only the `data_types` and `mask_data` sections are kept as raw YAML: their
//! keys are column names chosen by the source author, so they are resolved
//! separately with full issue reporting.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Mapping;
use tabclean_model::ContactPositions;

/// A complete source document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub conf_file: ConfFile,
    pub raw_source: RawSource,
    pub processed_source: ProcessedSource,
    #[serde(default)]
    pub data_types: Mapping,
    #[serde(default)]
    pub mask_data: Option<Mapping>,
}

impl SourceConfig {
    /// Whether the source is a spreadsheet with a two-row header.
    pub fn multilevel(&self) -> bool {
        self.raw_source.load_parameters.multilevel
    }

    /// Contact positions when the source goes through the row corrector.
    pub fn quality(&self) -> Option<&ContactPositions> {
        self.raw_source.source_type.quality.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfFile {
    /// `"{unit},{count}"` refresh cadence.
    #[serde(default)]
    pub refresh_rate: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSource {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    #[serde(default)]
    pub load_parameters: LoadParameters,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceType {
    pub specifics: SourceKind,
    #[serde(default)]
    pub quality: Option<ContactPositions>,
}

/// Where raw data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Query,
}

/// Physical layout of a raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Txt,
    Xlsx,
    Xls,
}

impl FileType {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, Self::Xlsx | Self::Xls)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoadParameters {
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// File name without extension. Also the prefix used to find the latest raw file.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Quote / escape character.
    #[serde(default)]
    pub special_char: Option<String>,
    #[serde(default)]
    pub decimal: Option<String>,
    #[serde(default)]
    pub header_row: Option<usize>,
    #[serde(default)]
    pub sheet_number: usize,
    #[serde(default, deserialize_with = "yes_flag")]
    pub multilevel: bool,
    /// Replace the loaded header with `data_types.names`.
    #[serde(default, deserialize_with = "yes_flag")]
    pub change_col_names: bool,
    #[serde(default)]
    pub query_file: Option<String>,
}

/// How the processed dataset is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveType {
    #[default]
    File,
    Table,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessedSource {
    #[serde(default)]
    pub save_type: SaveType,
    pub save_parameters: SaveParameters,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveParameters {
    pub path: PathBuf,
    pub tag: String,
    #[serde(default = "default_file_type")]
    pub file_type: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_file_type() -> String {
    "csv".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_encoding() -> String {
    "UTF-8-SIG".to_string()
}

/// Accepts `true`/`false`, `yes`/`no` and `1`/`0`.
fn yes_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => false,
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        Some(Flag::Text(value)) => {
            matches!(value.trim().to_lowercase().as_str(), "yes" | "true" | "y" | "1")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
raw_source:
  type:
    specifics: file
  load_parameters:
    file_type: csv
    change_col_names: "yes"
processed_source:
  save_parameters:
    path: /tmp/out
    tag: clients
"#;

    #[test]
    fn test_minimal_document_defaults() {
        let config: SourceConfig = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(config.raw_source.source_type.specifics, SourceKind::File);
        assert!(config.raw_source.load_parameters.change_col_names);
        assert!(!config.multilevel());
        assert_eq!(config.processed_source.save_type, SaveType::File);
        assert_eq!(config.processed_source.save_parameters.encoding, "UTF-8-SIG");
        assert!(config.conf_file.refresh_rate.is_none());
        assert!(config.quality().is_none());
    }

    #[test]
    fn test_unknown_specifics_rejected() {
        let text = MINIMAL.replace("specifics: file", "specifics: ftp");
        assert!(serde_yaml::from_str::<SourceConfig>(&text).is_err());
    }

    #[test]
    fn test_yes_flag_variants() {
        for (raw, expected) in [("true", true), ("yes", true), ("no", false), ("1", true), ("0", false)] {
            let text = format!(
                "raw_source:\n  type:\n    specifics: file\n  load_parameters:\n    multilevel: {raw}\nprocessed_source:\n  save_parameters:\n    path: x\n    tag: t\n"
            );
            let config: SourceConfig = serde_yaml::from_str(&text).unwrap();
            assert_eq!(config.multilevel(), expected, "flag {raw}");
        }
    }
}
