//! Query-backed sources.

use std::path::Path;

use polars::prelude::DataFrame;
use tabclean_common::rename_columns;

use crate::error::{IngestError, Result};

/// A database the pipeline can pull a source from.
///
/// No driver ships with tabclean; embedders supply one.
pub trait QuerySource {
    /// Run the query stored in `query_file`.
    fn fetch(&self, query_file: &Path) -> Result<DataFrame>;
}

/// Run a query and name its result columns.
pub fn fetch_query_table(
    source: &dyn QuerySource,
    query_file: &Path,
    columns: &[String],
) -> Result<DataFrame> {
    let mut df = source.fetch(query_file)?;
    if df.width() != columns.len() {
        return Err(IngestError::Query {
            query_file: query_file.to_path_buf(),
            message: format!(
                "result has {} columns but {} names are configured",
                df.width(),
                columns.len()
            ),
        });
    }
    rename_columns(&mut df, columns)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use tabclean_common::column_names;

    struct FixedQuery;

    impl QuerySource for FixedQuery {
        fn fetch(&self, _query_file: &Path) -> Result<DataFrame> {
            Ok(DataFrame::new(vec![
                Series::new("COL1".into(), vec!["1"]).into_column(),
                Series::new("COL2".into(), vec!["a"]).into_column(),
            ])?)
        }
    }

    #[test]
    fn test_fetch_names_columns() {
        let names = vec!["id".to_string(), "name".to_string()];
        let df = fetch_query_table(&FixedQuery, Path::new("clients.sql"), &names).unwrap();
        assert_eq!(column_names(&df), names);
    }

    #[test]
    fn test_fetch_width_mismatch() {
        let names = vec!["id".to_string()];
        assert!(matches!(
            fetch_query_table(&FixedQuery, Path::new("clients.sql"), &names),
            Err(IngestError::Query { .. })
        ));
    }
}
