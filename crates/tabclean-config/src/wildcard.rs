//! Wildcard column references.
//!
//! A column token ending in [`WILDCARD_SUFFIX`] stands for every dataset
//! column whose name starts with the text before the suffix.

use std::collections::BTreeSet;

use tabclean_model::TypeTag;
use tracing::{debug, info};

use crate::resolve::{DataTypes, DateSection};

pub const WILDCARD_SUFFIX: &str = "_#all-cols-starts-with#";

/// Prefix of a wildcard token, `None` for a plain column name.
pub fn wildcard_prefix(token: &str) -> Option<&str> {
    token.strip_suffix(WILDCARD_SUFFIX)
}

#[derive(Debug, Default)]
struct Expansion {
    columns: Vec<String>,
    /// Each wildcard prefix with the dataset columns it matched.
    matches: Vec<(String, Vec<String>)>,
}

fn expand(columns: &[String], dataset_columns: &[String]) -> Expansion {
    let mut expansion = Expansion {
        columns: columns
            .iter()
            .filter(|column| wildcard_prefix(column).is_none())
            .cloned()
            .collect(),
        matches: Vec::new(),
    };

    for prefix in columns.iter().filter_map(|column| wildcard_prefix(column)) {
        let found: Vec<String> = dataset_columns
            .iter()
            .map(|name| name.trim())
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect();
        debug!(prefix, matched = found.len(), "expanding wildcard column");
        for name in &found {
            if !expansion.columns.contains(name) {
                expansion.columns.push(name.clone());
            }
        }
        expansion.matches.push((prefix.to_string(), found));
    }

    expansion
}

/// Replace wildcard tokens by the matching dataset columns.
///
/// Plain names keep their order; expansions are appended without duplicates.
/// Applying it to an already expanded list returns the list unchanged.
pub fn expand_wildcards(columns: &[String], dataset_columns: &[String]) -> Vec<String> {
    expand(columns, dataset_columns).columns
}

impl DataTypes {
    /// Expand wildcard tokens of every expandable tag against the dataset header.
    pub fn expand_wildcards(&mut self, dataset_columns: &[String]) {
        for (tag, columns) in self.lists_mut() {
            if !TypeTag::EXPANDABLE.contains(tag) {
                continue;
            }
            let expansion = expand(columns, dataset_columns);
            if !expansion.matches.is_empty() {
                info!(tag = %tag, columns = expansion.columns.len(), "expanded wildcard columns");
            }
            *columns = expansion.columns;
        }

        if let Some(date) = self.date.as_mut() {
            expand_date_section(date, dataset_columns);
        }
    }
}

/// Date columns inherit a per-column format from the wildcard's overrides when
/// no general policy exists and the overrides agree on a single format.
fn expand_date_section(date: &mut DateSection, dataset_columns: &[String]) {
    let expansion = expand(&date.cols, dataset_columns);
    if !expansion.matches.is_empty() {
        info!(tag = %TypeTag::DateCols, columns = expansion.columns.len(), "expanded wildcard columns");
    }
    date.cols = expansion.columns;

    if date.options.has_general_policy() {
        return;
    }
    for (prefix, found) in expansion.matches {
        let formats: BTreeSet<&String> = date
            .options
            .column_formats
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, format)| format)
            .collect();
        if formats.len() != 1 {
            continue;
        }
        let Some(format) = formats.into_iter().next().cloned() else {
            continue;
        };
        for column in found {
            date.options
                .column_formats
                .entry(column)
                .or_insert_with(|| format.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_data_types;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_expand_appends_matching_columns() {
        let dataset = names(&["id", "amt_2023", "amt_2024", "other"]);
        let expanded = expand_wildcards(&names(&["amt_#all-cols-starts-with#", "id"]), &dataset);
        assert_eq!(expanded, names(&["id", "amt_2023", "amt_2024"]));
    }

    #[test]
    fn test_expand_skips_existing_columns() {
        let dataset = names(&["amt_a", "amt_b"]);
        let expanded = expand_wildcards(&names(&["amt_b", "amt_#all-cols-starts-with#"]), &dataset);
        assert_eq!(expanded, names(&["amt_b", "amt_a"]));
    }

    #[test]
    fn test_expand_trims_dataset_names() {
        let dataset = names(&[" amt_a "]);
        let expanded = expand_wildcards(&names(&["amt_#all-cols-starts-with#"]), &dataset);
        assert_eq!(expanded, names(&["amt_a"]));
    }

    #[test]
    fn test_date_overrides_inherited_without_general_policy() {
        let raw: serde_yaml::Mapping = serde_yaml::from_str(
            "date_cols:\n  cols: \"d_#all-cols-starts-with#\"\n  d_#all-cols-starts-with#: \"%d/%m/%Y\"\n",
        )
        .unwrap();
        let mut data_types = resolve_data_types(&raw, false).unwrap();
        data_types.expand_wildcards(&names(&["d_start", "d_end", "x"]));
        let date = data_types.date.unwrap();
        assert_eq!(date.cols, names(&["d_start", "d_end"]));
        assert_eq!(
            date.options.column_formats.get("d_end").map(String::as_str),
            Some("%d/%m/%Y")
        );
    }

    #[test]
    fn test_date_overrides_untouched_with_general_policy() {
        let raw: serde_yaml::Mapping = serde_yaml::from_str(
            "date_cols:\n  cols: \"d_#all-cols-starts-with#\"\n  global_format: \"%Y\"\n  d_x: \"%d/%m/%Y\"\n",
        )
        .unwrap();
        let mut data_types = resolve_data_types(&raw, false).unwrap();
        data_types.expand_wildcards(&names(&["d_start"]));
        let date = data_types.date.unwrap();
        assert!(!date.options.column_formats.contains_key("d_start"));
    }

    #[test]
    fn test_date_overrides_ambiguous_are_not_inherited() {
        let raw: serde_yaml::Mapping = serde_yaml::from_str(
            "date_cols:\n  cols: \"d_#all-cols-starts-with#\"\n  d_a: \"%Y\"\n  d_b: \"%m\"\n",
        )
        .unwrap();
        let mut data_types = resolve_data_types(&raw, false).unwrap();
        data_types.expand_wildcards(&names(&["d_c"]));
        assert!(!data_types.date.unwrap().options.column_formats.contains_key("d_c"));
    }
}
