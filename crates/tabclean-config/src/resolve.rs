//! Resolution of the raw `data_types` section into normalized column lists.
//!
//! Every column-list tag becomes a trimmed list of names. In multilevel mode a
//! tag may instead hold one column string per group, and each group's columns
//! are prefixed with `{group}_`. The date tag is a section: its columns live
//! under `cols` next to the format policy and per-column format overrides.
//!
//! Resolution never stops at the first problem. Every shape issue of the
//! section is collected so a broken document is reported in one pass.

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::{Mapping, Value};
use tabclean_model::{DateOptions, TypeTag, split_column_list};

use crate::error::{ConfigError, ConfigIssue, Result};

const COLS_KEY: &str = "cols";
const GLOBAL_FORMAT_KEY: &str = "global_format";
const OTHER_FORMATS_KEY: &str = "other_formats";
const MIX_KEY: &str = "mix";

/// Canonical form of a column string: newlines removed, tokens trimmed,
/// empty tokens dropped, joined with commas.
pub fn normalize_column_string(value: &str) -> String {
    split_column_list(value).join(",")
}

/// Columns and format policy of the date tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSection {
    pub cols: Vec<String>,
    pub options: DateOptions,
}

/// The resolved `data_types` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypes {
    /// Tags present in the document, including those declared as null.
    declared: BTreeSet<TypeTag>,
    lists: BTreeMap<TypeTag, Vec<String>>,
    pub date: Option<DateSection>,
    /// Missing columns are skipped instead of failing the run.
    pub optional: bool,
    pub standardize_cols_names: bool,
    pub duplicated_macro_tag: Option<String>,
}

impl Default for DataTypes {
    fn default() -> Self {
        Self {
            declared: BTreeSet::new(),
            lists: BTreeMap::new(),
            date: None,
            optional: false,
            standardize_cols_names: true,
            duplicated_macro_tag: None,
        }
    }
}

impl DataTypes {
    pub fn is_declared(&self, tag: TypeTag) -> bool {
        self.declared.contains(&tag)
    }

    /// Column list of a tag, `None` when the tag is absent or null.
    pub fn columns(&self, tag: TypeTag) -> Option<&[String]> {
        if tag.is_sectioned() {
            self.date.as_ref().map(|date| date.cols.as_slice())
        } else {
            self.lists.get(&tag).map(Vec::as_slice)
        }
    }

    /// Column list of a tag as a canonical comma-joined string.
    pub fn column_string(&self, tag: TypeTag) -> Option<String> {
        self.columns(tag).map(|columns| columns.join(","))
    }

    /// Replace the column list of a tag, declaring it if needed.
    pub fn set_columns(&mut self, tag: TypeTag, columns: Vec<String>) {
        self.declared.insert(tag);
        if tag.is_sectioned() {
            self.date.get_or_insert_with(DateSection::default).cols = columns;
        } else {
            self.lists.insert(tag, columns);
        }
    }

    pub(crate) fn lists_mut(&mut self) -> impl Iterator<Item = (&TypeTag, &mut Vec<String>)> {
        self.lists.iter_mut()
    }
}

/// Resolve a raw `data_types` mapping.
pub fn resolve_data_types(raw: &Mapping, multilevel: bool) -> Result<DataTypes> {
    let mut issues = Vec::new();
    let data_types = collect_data_types(raw, multilevel, &mut issues);
    if issues.is_empty() {
        Ok(data_types)
    } else {
        Err(ConfigError::Invalid { issues })
    }
}

pub(crate) fn collect_data_types(
    raw: &Mapping,
    multilevel: bool,
    issues: &mut Vec<ConfigIssue>,
) -> DataTypes {
    let mut data_types = DataTypes::default();

    for tag in TypeTag::COLUMN_LISTS {
        let Some(value) = raw.get(tag.key()) else {
            continue;
        };
        data_types.declared.insert(tag);
        let location = format!("data_types.{}", tag.key());

        if tag.is_sectioned() {
            data_types.date = date_section(value, multilevel, &location, issues);
            continue;
        }

        match value {
            Value::Null => {}
            Value::String(text) => {
                data_types.lists.insert(tag, split_column_list(text));
            }
            Value::Mapping(groups) if multilevel => {
                data_types
                    .lists
                    .insert(tag, grouped_columns(groups, &location, issues));
            }
            _ => issues.push(ConfigIssue::new(
                location,
                "expected a comma-separated column string",
            )),
        }
    }

    match raw.get("optional") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(flag)) => data_types.optional = *flag,
        Some(Value::Number(number)) if number.as_i64().is_some() => {
            data_types.optional = number.as_i64() != Some(0);
        }
        Some(_) => issues.push(ConfigIssue::new(
            "data_types.optional",
            "expected a boolean or 0/1",
        )),
    }

    match raw.get("standardize_cols_names") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(flag)) => data_types.standardize_cols_names = *flag,
        Some(_) => issues.push(ConfigIssue::new(
            "data_types.standardize_cols_names",
            "expected a boolean",
        )),
    }

    match raw.get("duplicated_macro_tag") {
        None | Some(Value::Null) => {}
        Some(Value::String(tag)) => data_types.duplicated_macro_tag = Some(tag.trim().to_string()),
        Some(_) => issues.push(ConfigIssue::new(
            "data_types.duplicated_macro_tag",
            "expected a string",
        )),
    }

    if multilevel {
        check_multilevel_tags(&data_types, issues);
    }

    data_types
}

fn check_multilevel_tags(data_types: &DataTypes, issues: &mut Vec<ConfigIssue>) {
    let macro_tags = data_types.columns(TypeTag::MacroTagsNames);
    let micro_tags = data_types.columns(TypeTag::MicroTagsNames);
    match (macro_tags, micro_tags) {
        (Some(macro_tags), Some(micro_tags)) if macro_tags.len() != micro_tags.len() => {
            issues.push(ConfigIssue::new(
                "data_types.micro_tags_names",
                format!(
                    "expected {} micro tags to pair with the macro tags, found {}",
                    macro_tags.len(),
                    micro_tags.len()
                ),
            ));
        }
        (Some(_), Some(_)) => {}
        _ => issues.push(ConfigIssue::new(
            "data_types",
            "multilevel sources require macro_tags_names and micro_tags_names",
        )),
    }
}

/// Render a YAML key as text. Column and group names may be written as numbers.
fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn prefixed(group: &str, columns: Vec<String>) -> Vec<String> {
    columns
        .into_iter()
        .map(|column| format!("{group}_{column}"))
        .collect()
}

fn grouped_columns(groups: &Mapping, location: &str, issues: &mut Vec<ConfigIssue>) -> Vec<String> {
    let mut all = Vec::new();
    for (group, columns) in groups {
        let Some(group) = key_text(group) else {
            issues.push(ConfigIssue::new(location, "group names must be scalars"));
            continue;
        };
        match columns {
            Value::Null => {}
            Value::String(text) => all.extend(prefixed(&group, split_column_list(text))),
            _ => issues.push(ConfigIssue::new(
                format!("{location}.{group}"),
                "expected a comma-separated column string",
            )),
        }
    }
    all
}

fn date_section(
    value: &Value,
    multilevel: bool,
    location: &str,
    issues: &mut Vec<ConfigIssue>,
) -> Option<DateSection> {
    match value {
        Value::Null => None,
        Value::Mapping(section) if multilevel && section.get(COLS_KEY).is_none() => {
            Some(grouped_date_section(section, location, issues))
        }
        Value::Mapping(section) => Some(flat_date_section(section, None, location, issues)),
        _ => {
            issues.push(ConfigIssue::new(
                location,
                "expected a section with a `cols` key",
            ));
            None
        }
    }
}

fn flat_date_section(
    section: &Mapping,
    group: Option<&str>,
    location: &str,
    issues: &mut Vec<ConfigIssue>,
) -> DateSection {
    let mut date = DateSection::default();

    match section.get(COLS_KEY) {
        None => issues.push(ConfigIssue::new(
            location,
            "missing required key `cols`",
        )),
        Some(Value::Null) => {}
        Some(Value::String(text)) => {
            let columns = split_column_list(text);
            date.cols = match group {
                Some(group) => prefixed(group, columns),
                None => columns,
            };
        }
        Some(_) => issues.push(ConfigIssue::new(
            format!("{location}.{COLS_KEY}"),
            "expected a comma-separated column string",
        )),
    }

    for (key, value) in section {
        let Some(key) = key_text(key) else {
            issues.push(ConfigIssue::new(location, "keys must be scalars"));
            continue;
        };
        if key == COLS_KEY {
            continue;
        }
        let text = match value {
            Value::Null => continue,
            Value::String(text) => text.trim().to_string(),
            _ => {
                issues.push(ConfigIssue::new(
                    format!("{location}.{key}"),
                    "expected a format string",
                ));
                continue;
            }
        };
        match key.as_str() {
            GLOBAL_FORMAT_KEY => date.options.global_format = Some(text),
            OTHER_FORMATS_KEY => date.options.other_formats = Some(text),
            MIX_KEY => {
                date.options.mix = text
                    .split(',')
                    .map(str::trim)
                    .filter(|format| !format.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            column => {
                let column = match group {
                    Some(group) => format!("{group}_{column}"),
                    None => column.to_string(),
                };
                date.options.column_formats.insert(column, text);
            }
        }
    }

    date
}

fn grouped_date_section(
    groups: &Mapping,
    location: &str,
    issues: &mut Vec<ConfigIssue>,
) -> DateSection {
    let mut merged = DateSection::default();
    for (group, section) in groups {
        let Some(group) = key_text(group) else {
            issues.push(ConfigIssue::new(location, "group names must be scalars"));
            continue;
        };
        let group_location = format!("{location}.{group}");
        let Value::Mapping(section) = section else {
            issues.push(ConfigIssue::new(
                group_location,
                "expected a section with a `cols` key",
            ));
            continue;
        };
        let part = flat_date_section(section, Some(&group), &group_location, issues);
        merged.cols.extend(part.cols);
        merged.options.column_formats.extend(part.options.column_formats);
        merge_policy(
            &mut merged.options.global_format,
            part.options.global_format,
            &format!("{group_location}.{GLOBAL_FORMAT_KEY}"),
            issues,
        );
        merge_policy(
            &mut merged.options.other_formats,
            part.options.other_formats,
            &format!("{group_location}.{OTHER_FORMATS_KEY}"),
            issues,
        );
        if !part.options.mix.is_empty() {
            if merged.options.mix.is_empty() {
                merged.options.mix = part.options.mix;
            } else if merged.options.mix != part.options.mix {
                issues.push(ConfigIssue::new(
                    format!("{group_location}.{MIX_KEY}"),
                    "groups declare different format lists",
                ));
            }
        }
    }
    merged
}

fn merge_policy(
    current: &mut Option<String>,
    incoming: Option<String>,
    location: &str,
    issues: &mut Vec<ConfigIssue>,
) {
    let Some(incoming) = incoming else {
        return;
    };
    match current {
        Some(existing) if *existing != incoming => issues.push(ConfigIssue::new(
            location,
            format!("conflicts with format '{existing}' declared by another group"),
        )),
        Some(_) => {}
        None => *current = Some(incoming),
    }
}
