//! Whole-document resolution.

use std::path::PathBuf;

use serde_yaml::{Mapping, Value};
use tabclean_model::{Cadence, DecimalSeparator, MaskColumn, MaskSettings, TypeTag};

use crate::document::SourceConfig;
use crate::error::{ConfigError, ConfigIssue, Result};
use crate::resolve::{DataTypes, collect_data_types};

/// Everything the pipeline needs from a document, validated up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub data_types: DataTypes,
    pub cadence: Cadence,
    pub decimal: Option<DecimalSeparator>,
    pub mask: Option<MaskSettings>,
}

/// Resolve a document, reporting every shape problem at once.
pub fn resolve_source(config: &SourceConfig) -> Result<ResolvedSource> {
    let mut issues = Vec::new();

    let data_types = collect_data_types(&config.data_types, config.multilevel(), &mut issues);

    let cadence = match config.conf_file.refresh_rate.as_deref() {
        None => Cadence::NONE,
        Some(text) => text.parse().unwrap_or_else(|err| {
            issues.push(ConfigIssue::new("conf_file.refresh_rate", format!("{err}")));
            Cadence::NONE
        }),
    };

    let decimal: Option<DecimalSeparator> = match config.raw_source.load_parameters.decimal.as_deref() {
        None => None,
        Some(text) => match text.parse() {
            Ok(decimal) => Some(decimal),
            Err(err) => {
                issues.push(ConfigIssue::new(
                    "raw_source.load_parameters.decimal",
                    format!("{err}"),
                ));
                None
            }
        },
    };

    let mask = config
        .mask_data
        .as_ref()
        .and_then(|section| mask_settings(section, &mut issues));

    if config.quality().is_some() && data_types.columns(TypeTag::Names).is_none() {
        issues.push(ConfigIssue::new(
            "data_types.names",
            "required when raw_source.type.quality is configured",
        ));
    }
    if config.raw_source.load_parameters.change_col_names
        && data_types.columns(TypeTag::Names).is_none()
    {
        issues.push(ConfigIssue::new(
            "data_types.names",
            "required when change_col_names is set",
        ));
    }

    if issues.is_empty() {
        Ok(ResolvedSource {
            data_types,
            cadence,
            decimal,
            mask,
        })
    } else {
        Err(ConfigError::Invalid { issues })
    }
}

fn mask_settings(section: &Mapping, issues: &mut Vec<ConfigIssue>) -> Option<MaskSettings> {
    let references_path = match section.get("references_path") {
        Some(Value::String(path)) => Some(PathBuf::from(path)),
        Some(_) => {
            issues.push(ConfigIssue::new(
                "mask_data.references_path",
                "expected a directory path",
            ));
            None
        }
        None => {
            issues.push(ConfigIssue::new(
                "mask_data",
                "missing required key `references_path`",
            ));
            None
        }
    };

    let mut columns = Vec::new();
    match section.get("mask_cols") {
        Some(Value::Mapping(pairs)) => {
            for (column, key_table) in pairs {
                match (column, key_table) {
                    (Value::String(column), Value::String(key_table)) => columns.push(MaskColumn {
                        column: column.trim().to_string(),
                        key_table: key_table.trim().to_string(),
                    }),
                    _ => issues.push(ConfigIssue::new(
                        "mask_data.mask_cols",
                        "expected `column: key_table_name` string pairs",
                    )),
                }
            }
        }
        Some(_) => issues.push(ConfigIssue::new(
            "mask_data.mask_cols",
            "expected a mapping of column to key table name",
        )),
        None => issues.push(ConfigIssue::new(
            "mask_data",
            "missing required key `mask_cols`",
        )),
    }

    references_path.map(|references_path| MaskSettings {
        references_path,
        columns,
    })
}
