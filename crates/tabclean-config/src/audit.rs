//! Coverage audit of the declared type tags against the dataset header.

use std::collections::HashMap;

use tabclean_model::TypeTag;
use tracing::warn;

use crate::resolve::DataTypes;

/// Findings of [`audit_column_coverage`]. Never fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Tags of the fixed coverage set absent from the document.
    pub missing_tags: Vec<TypeTag>,
    /// Dataset columns claimed by no tag.
    pub unclassified: Vec<String>,
    /// Dataset columns claimed more than once.
    pub multiply_classified: Vec<String>,
}

impl CoverageReport {
    pub fn is_clean(&self) -> bool {
        self.missing_tags.is_empty()
            && self.unclassified.is_empty()
            && self.multiply_classified.is_empty()
    }
}

/// Warn about missing tags and about columns with zero or several types.
pub fn audit_column_coverage(data_types: &DataTypes, dataset_columns: &[String]) -> CoverageReport {
    let mut report = CoverageReport::default();

    for tag in TypeTag::COVERAGE {
        if !data_types.is_declared(tag) {
            warn!(tag = %tag, "type tag missing from data_types");
            report.missing_tags.push(tag);
        }
    }

    let mut claims: HashMap<&str, usize> = HashMap::new();
    for tag in TypeTag::COVERAGE {
        for column in data_types.columns(tag).unwrap_or_default() {
            *claims.entry(column.as_str()).or_default() += 1;
        }
    }

    for column in dataset_columns {
        match claims.get(column.as_str()).copied().unwrap_or(0) {
            0 => {
                warn!(column = %column, "column has no data type identified");
                report.unclassified.push(column.clone());
            }
            1 => {}
            _ => {
                warn!(column = %column, "column has more than one data type identified");
                report.multiply_classified.push(column.clone());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_data_types;

    #[test]
    fn test_audit_reports_every_finding() {
        let raw: serde_yaml::Mapping = serde_yaml::from_str(
            "str_cols: \"name,city\"\nint_cols: city\nn_client_cols: id\nnif_cols: null\nfloat_cols: null\ncontact_cols: null\n",
        )
        .unwrap();
        let data_types = resolve_data_types(&raw, false).unwrap();
        let dataset: Vec<String> = ["id", "name", "city", "extra"]
            .iter()
            .map(|name| (*name).to_string())
            .collect();

        let report = audit_column_coverage(&data_types, &dataset);
        assert_eq!(report.missing_tags, vec![TypeTag::DateCols]);
        assert_eq!(report.unclassified, vec!["extra".to_string()]);
        assert_eq!(report.multiply_classified, vec!["city".to_string()]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_audit_ignores_names_tag() {
        let raw: serde_yaml::Mapping = serde_yaml::from_str(
            "names: \"a\"\nstr_cols: a\nint_cols: null\nn_client_cols: null\nnif_cols: null\nfloat_cols: null\ncontact_cols: null\ndate_cols: null\n",
        )
        .unwrap();
        let data_types = resolve_data_types(&raw, false).unwrap();
        let report = audit_column_coverage(&data_types, &["a".to_string()]);
        assert!(report.is_clean());
    }
}
