//! Tests for directive application on whole datasets.

use polars::prelude::*;
use tabclean_model::{
    ColumnSelection, ColumnTypeDirective, DateOptions, DecimalSeparator, DirectiveOptions,
    RenameOptions, TypeKind, TypeTag,
};
use tabclean_standardize::{StandardizeError, apply_directive};

fn test_df(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

fn directive(tag: TypeTag, kind: TypeKind, columns: &[&str]) -> ColumnTypeDirective {
    ColumnTypeDirective::new(
        tag,
        kind,
        ColumnSelection::new(columns.iter().map(|c| (*c).to_string()).collect(), false),
    )
}

fn strings(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_integer_directive_produces_int64_column() {
    let mut df = test_df(vec![("n", vec![Some("1.234.567"), Some("12,5"), Some("abc"), None])]);
    let outcome = apply_directive(&mut df, &directive(TypeTag::IntCols, TypeKind::Integer, &["n"])).unwrap();

    assert_eq!(outcome.columns, vec!["n".to_string()]);
    let values: Vec<Option<i64>> = df.column("n").unwrap().i64().unwrap().into_iter().collect();
    assert_eq!(values, vec![Some(1_234_567), Some(125), Some(0), Some(0)]);
}

#[test]
fn test_float_directive_counts_parse_errors() {
    let mut df = test_df(vec![("amount", vec![Some("1.234,56"), Some("x"), None])]);
    let float = directive(TypeTag::FloatCols, TypeKind::Float, &["amount"]).with_options(
        DirectiveOptions::Float {
            decimal: Some(DecimalSeparator::Comma),
        },
    );
    let outcome = apply_directive(&mut df, &float).unwrap();

    assert_eq!(outcome.parse_errors, 1);
    let values: Vec<Option<f64>> = df.column("amount").unwrap().f64().unwrap().into_iter().collect();
    assert_eq!(values, vec![Some(1234.56), Some(0.0), Some(0.0)]);
}

#[test]
fn test_date_directive_with_short_and_bad_values() {
    let mut df = test_df(vec![(
        "created",
        vec![Some("2023-05-01"), Some(""), Some("abc"), Some("2023-13-45"), None],
    )]);
    let date = directive(TypeTag::DateCols, TypeKind::Date, &["created"]).with_options(
        DirectiveOptions::Date(DateOptions {
            global_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        }),
    );
    let outcome = apply_directive(&mut df, &date).unwrap();

    assert_eq!(outcome.parse_errors, 1);
    assert_eq!(strings(&df, "created"), vec!["20230501_000000", "", "", "", ""]);
}

#[test]
fn test_date_directive_without_format_fails() {
    let mut df = test_df(vec![("created", vec![Some("2023-05-01")])]);
    let date = directive(TypeTag::DateCols, TypeKind::Date, &["created"])
        .with_options(DirectiveOptions::Date(DateOptions::default()));
    let err = apply_directive(&mut df, &date).unwrap_err();
    assert!(matches!(err, StandardizeError::MissingDateFormat { .. }));
}

#[test]
fn test_string_and_national_id_directives() {
    let mut df = test_df(vec![
        ("name", vec![Some("Ana Sousa"), None]),
        ("nif", vec![Some(" AB-12.34 "), None]),
    ]);
    apply_directive(&mut df, &directive(TypeTag::StrCols, TypeKind::String, &["name"])).unwrap();
    apply_directive(&mut df, &directive(TypeTag::NifCols, TypeKind::NationalId, &["nif"])).unwrap();

    assert_eq!(strings(&df, "name"), vec!["anasousa", ""]);
    assert_eq!(strings(&df, "nif"), vec!["ab012", "0"]);
}

#[test]
fn test_empty_national_id_cells_become_zero() {
    // Loaders produce empty strings for blank cells, never nulls.
    let mut df = test_df(vec![("nif", vec![Some(""), Some("123"), Some(" ")])]);
    apply_directive(&mut df, &directive(TypeTag::NifCols, TypeKind::NationalId, &["nif"])).unwrap();

    assert_eq!(strings(&df, "nif"), vec!["0", "123", "0"]);
}

#[test]
fn test_missing_required_column_fails_and_optional_is_skipped() {
    let mut df = test_df(vec![("a", vec![Some("1")])]);
    let required = directive(TypeTag::StrCols, TypeKind::String, &["a", "b"]);
    assert!(matches!(
        apply_directive(&mut df, &required),
        Err(StandardizeError::ColumnNotFound { .. })
    ));

    let mut optional = required.clone();
    optional.columns.optional = true;
    let outcome = apply_directive(&mut df, &optional).unwrap();
    assert_eq!(outcome.columns, vec!["a".to_string()]);
}

#[test]
fn test_rename_after_standardization() {
    let mut df = test_df(vec![("A", vec![Some("1")]), ("B", vec![Some("2")])]);
    let rename = ColumnTypeDirective::new(TypeTag::Names, TypeKind::Rename, ColumnSelection::default())
        .with_options(DirectiveOptions::Rename(RenameOptions {
            names: Some(vec!["Client Id".to_string(), "Total €".to_string()]),
            standardize: true,
        }));
    apply_directive(&mut df, &rename).unwrap();
    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(names, vec!["client_id", "total__"]);
}
