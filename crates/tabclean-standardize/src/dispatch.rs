//! Directive dispatch over the closed set of standardizer kinds.

use polars::prelude::DataFrame;
use tabclean_model::{ColumnTypeDirective, DirectiveOptions, TypeKind};
use tracing::info;

use crate::StandardizeOutcome;
use crate::date::standardize_dates;
use crate::error::{Result, StandardizeError};
use crate::float::standardize_floats;
use crate::integer::standardize_integers;
use crate::national_id::standardize_national_ids;
use crate::rename::rename_dataset_columns;
use crate::string::standardize_strings;

/// Apply one directive to the dataset in place.
pub fn apply_directive(df: &mut DataFrame, directive: &ColumnTypeDirective) -> Result<StandardizeOutcome> {
    let mismatch = || StandardizeError::TypeMismatch {
        kind: directive.kind,
        options: directive.options.label(),
    };
    if !directive.options.fits(directive.kind) {
        return Err(mismatch());
    }

    info!(kind = %directive.kind, tag = %directive.tag, "start normalization");
    let selection = &directive.columns;
    match (directive.kind, &directive.options) {
        (TypeKind::String, _) => standardize_strings(df, selection),
        (TypeKind::Integer, _) => standardize_integers(df, selection),
        (TypeKind::NationalId, _) => standardize_national_ids(df, selection),
        (TypeKind::Float, DirectiveOptions::Float { decimal }) => {
            standardize_floats(df, selection, *decimal)
        }
        (TypeKind::Float, _) => standardize_floats(df, selection, None),
        (TypeKind::Date, DirectiveOptions::Date(options)) => standardize_dates(df, selection, options),
        (TypeKind::Rename, DirectiveOptions::Rename(options)) => rename_dataset_columns(df, options),
        (TypeKind::Date | TypeKind::Rename, _) => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use tabclean_model::{ColumnSelection, DateOptions, TypeTag};

    #[test]
    fn test_mismatched_options_rejected() {
        let mut df = DataFrame::new(vec![Series::new("a".into(), vec!["1"]).into_column()]).unwrap();
        let directive = ColumnTypeDirective::new(
            TypeTag::IntCols,
            TypeKind::Integer,
            ColumnSelection::new(vec!["a".into()], false),
        )
        .with_options(DirectiveOptions::Date(DateOptions::default()));
        let err = apply_directive(&mut df, &directive).unwrap_err();
        assert!(matches!(
            err,
            StandardizeError::TypeMismatch {
                kind: TypeKind::Integer,
                options: "date"
            }
        ));
    }

    #[test]
    fn test_date_without_options_rejected() {
        let mut df = DataFrame::new(vec![Series::new("a".into(), vec!["1"]).into_column()]).unwrap();
        let directive = ColumnTypeDirective::new(
            TypeTag::DateCols,
            TypeKind::Date,
            ColumnSelection::new(vec!["a".into()], false),
        );
        assert!(apply_directive(&mut df, &directive).is_err());
    }
}
