//! Header rewrite.

use std::sync::LazyLock;

use polars::prelude::DataFrame;
use regex::Regex;
use tabclean_common::{column_names, rename_columns};
use tabclean_model::{RenameOptions, TypeKind};
use tracing::{debug, info};

use crate::StandardizeOutcome;
use crate::error::{Result, StandardizeError};

/// Characters kept in a standardized column name; the rest become spaces.
static NON_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9 \n.]").expect("Invalid column name regex"));

/// `Ã‡` is how a cedilla `Ç` reads after a Latin-1 / UTF-8 round trip.
const MISDECODED_CEDILLA: &str = "Ã‡";

/// Lower-case snake form of a column name.
pub fn standardize_column_name(name: &str) -> String {
    let name = name.replace(MISDECODED_CEDILLA, "C").to_lowercase();
    NON_NAME_CHARS.replace_all(&name, " ").replace(' ', "_")
}

/// Rewrite the dataset header positionally.
///
/// With `names` configured they replace the header (their count must equal the
/// dataset width); otherwise the current names are rewritten.
pub fn rename_dataset_columns(df: &mut DataFrame, options: &RenameOptions) -> Result<StandardizeOutcome> {
    let names = match &options.names {
        Some(names) => {
            if names.len() != df.width() {
                return Err(StandardizeError::LengthMismatch {
                    expected: df.width(),
                    found: names.len(),
                });
            }
            names.clone()
        }
        None => column_names(df),
    };

    let names: Vec<String> = if options.standardize {
        names.iter().map(|name| standardize_column_name(name)).collect()
    } else {
        names
    };
    debug!(columns = ?names, "new header");

    rename_columns(df, &names)?;
    info!(width = names.len(), "column names updated");
    Ok(StandardizeOutcome::new(TypeKind::Rename, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Nº Cliente".into(), vec!["1"]).into_column(),
            Series::new("Data Criação".into(), vec!["x"]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_standardize_column_name() {
        assert_eq!(standardize_column_name("Nº Cliente"), "n__cliente");
        assert_eq!(standardize_column_name("AVALIAÃ‡AO"), "avaliacao");
        assert_eq!(standardize_column_name("Valor (EUR)"), "valor__eur_");
        assert_eq!(standardize_column_name("v1.2"), "v1.2");
    }

    #[test]
    fn test_rename_with_configured_names() {
        let mut df = frame();
        let options = RenameOptions {
            names: Some(vec!["Client Id".to_string(), "created".to_string()]),
            standardize: true,
        };
        rename_dataset_columns(&mut df, &options).unwrap();
        assert_eq!(column_names(&df), vec!["client_id", "created"]);
    }

    #[test]
    fn test_rename_own_names_without_standardization() {
        let mut df = frame();
        let options = RenameOptions {
            names: None,
            standardize: false,
        };
        rename_dataset_columns(&mut df, &options).unwrap();
        assert_eq!(column_names(&df), vec!["Nº Cliente", "Data Criação"]);
    }

    #[test]
    fn test_rename_length_mismatch() {
        let mut df = frame();
        let options = RenameOptions {
            names: Some(vec!["only".to_string()]),
            standardize: true,
        };
        let err = rename_dataset_columns(&mut df, &options).unwrap_err();
        assert!(matches!(
            err,
            StandardizeError::LengthMismatch {
                expected: 2,
                found: 1
            }
        ));
    }
}
