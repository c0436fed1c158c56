//! Column selection against the dataset header.

use polars::prelude::DataFrame;
use tabclean_model::{ColumnSelection, TypeKind};
use tracing::warn;

use crate::error::{Result, StandardizeError};

/// Columns of `selection` present in `df`.
///
/// Absent columns are skipped with a warning when the selection is optional,
/// otherwise the first one fails the directive.
pub fn resolve_selection(
    df: &DataFrame,
    selection: &ColumnSelection,
    kind: TypeKind,
) -> Result<Vec<String>> {
    let mut present = Vec::with_capacity(selection.names.len());
    for name in &selection.names {
        if df.column(name).is_ok() {
            present.push(name.clone());
        } else if selection.optional {
            warn!(column = %name, kind = %kind, "column is not present on the source");
        } else {
            return Err(StandardizeError::ColumnNotFound {
                column: name.clone(),
                kind,
            });
        }
    }
    Ok(present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![Series::new("a".into(), vec!["1"]).into_column()]).unwrap()
    }

    #[test]
    fn test_optional_selection_drops_missing() {
        let selection = ColumnSelection::new(vec!["a".into(), "b".into()], true);
        let present = resolve_selection(&frame(), &selection, TypeKind::String).unwrap();
        assert_eq!(present, vec!["a".to_string()]);
    }

    #[test]
    fn test_required_selection_fails_on_missing() {
        let selection = ColumnSelection::new(vec!["b".into()], false);
        let err = resolve_selection(&frame(), &selection, TypeKind::Integer).unwrap_err();
        assert!(matches!(err, StandardizeError::ColumnNotFound { ref column, .. } if column == "b"));
    }
}
