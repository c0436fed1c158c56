//! Dataset pseudonymization.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use polars::prelude::{DataFrame, NamedFrom, Series};
use tabclean_common::column_optional_strings;
use tabclean_model::MaskSettings;
use tracing::{debug, info};

use crate::error::{MaskError, Result};
use crate::store::{KeyTableStore, KeyTableTransaction};

/// What pseudonymization did to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedColumn {
    pub column: String,
    pub key_table: String,
    /// Values replaced.
    pub values: usize,
}

/// Result of a pseudonymization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskReport {
    pub columns: Vec<MaskedColumn>,
    /// Identifiers created, per key table.
    pub new_identifiers: BTreeMap<String, usize>,
}

/// Replace the values of every configured column by their key-table
/// identifiers and persist the enlarged key tables.
///
/// Columns sharing a key table share one transaction, so equal raw values get
/// the same identifier in both. Tables are committed only after every column
/// was replaced. Null cells are keyed as empty text, so they share the
/// identifier of empty cells.
pub fn pseudonymize(df: &mut DataFrame, settings: &MaskSettings) -> Result<MaskReport> {
    for mask in &settings.columns {
        if df.column(&mask.column).is_err() {
            return Err(MaskError::ColumnNotFound {
                column: mask.column.clone(),
            });
        }
    }

    let store = KeyTableStore::open(&settings.references_path)?;
    let mut transactions: BTreeMap<String, KeyTableTransaction> = BTreeMap::new();
    let mut report = MaskReport::default();

    for mask in &settings.columns {
        let tx = match transactions.entry(mask.key_table.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(store.begin(&mask.key_table)?)
            }
        };

        let values = column_optional_strings(df, &mask.column)?;
        let masked: Vec<String> = values
            .iter()
            .map(|value| tx.identifier_for(value.as_deref().unwrap_or_default()))
            .collect();
        let replaced = masked.len();
        df.with_column(Series::new(mask.column.as_str().into(), masked))?;

        debug!(
            column = %mask.column,
            table = %mask.key_table,
            values = replaced,
            "Pseudonymized column"
        );
        report.columns.push(MaskedColumn {
            column: mask.column.clone(),
            key_table: mask.key_table.clone(),
            values: replaced,
        });
    }

    for (name, tx) in transactions {
        let added = tx.commit()?;
        report.new_identifiers.insert(name, added);
    }

    info!(
        columns = report.columns.len(),
        tables = report.new_identifiers.len(),
        "Pseudonymization complete"
    );
    Ok(report)
}
