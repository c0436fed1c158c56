//! DataFrame construction and header rewrites.

use polars::prelude::*;

/// Build an all-string DataFrame from a header and row-major cells.
///
/// Rows shorter than the header are padded with empty cells and longer rows are
/// cut; callers that care about width mismatches check before calling.
pub fn frame_from_rows(headers: &[String], rows: &[Vec<String>]) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let values: Vec<&str> = rows
            .iter()
            .map(|row| row.get(col_idx).map(String::as_str).unwrap_or(""))
            .collect();
        columns.push(Series::new(header.as_str().into(), values).into_column());
    }
    DataFrame::new(columns)
}

/// Replace a column with a string column of the same name.
pub fn replace_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<String>,
) -> PolarsResult<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Positionally rename every column.
///
/// Fails when the name count differs from the frame width or when the new names
/// are not unique.
pub fn rename_columns(df: &mut DataFrame, names: &[String]) -> PolarsResult<()> {
    if names.len() != df.width() {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "expected {} column names, got {}",
                df.width(),
                names.len()
            )
            .into(),
        ));
    }
    let renamed: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(names)
        .map(|(column, name)| column.clone().with_name(name.as_str().into()))
        .collect();
    *df = DataFrame::new(renamed)?;
    Ok(())
}

/// Keep only the columns for which `keep` returns true, preserving order.
pub fn retain_columns<F>(df: &DataFrame, mut keep: F) -> PolarsResult<DataFrame>
where
    F: FnMut(&str) -> bool,
{
    let kept: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|column| keep(column.name().as_str()))
        .cloned()
        .collect();
    DataFrame::new(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_strings;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn test_frame_from_rows_pads_short_rows() {
        let rows = vec![
            vec!["1".to_string(), "a".to_string()],
            vec!["2".to_string()],
        ];
        let df = frame_from_rows(&headers(&["id", "name"]), &rows).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(column_strings(&df, "name").unwrap(), vec!["a", ""]);
    }

    #[test]
    fn test_rename_columns_positional() {
        let mut df = frame_from_rows(&headers(&["A", "B"]), &[]).unwrap();
        rename_columns(&mut df, &headers(&["x", "y"])).unwrap();
        assert_eq!(crate::column_names(&df), vec!["x", "y"]);
    }

    #[test]
    fn test_rename_columns_length_mismatch() {
        let mut df = frame_from_rows(&headers(&["A", "B"]), &[]).unwrap();
        assert!(rename_columns(&mut df, &headers(&["x"])).is_err());
    }

    #[test]
    fn test_retain_columns() {
        let df = frame_from_rows(&headers(&["keep", "Unnamed: 1"]), &[]).unwrap();
        let kept = retain_columns(&df, |name| !name.starts_with("Unnamed")).unwrap();
        assert_eq!(crate::column_names(&kept), vec!["keep"]);
    }
}
