//! Spreadsheet loading.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::DataFrame;
use tabclean_common::format_numeric;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::table::{TableOptions, build_table};

/// Settings for reading one sheet of a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetOptions {
    /// Zero-based sheet index.
    pub sheet: usize,
    pub table: TableOptions,
}

/// Read a sheet of an `xlsx`/`xls` workbook with every cell as a string.
///
/// Rows and columns before the used range of the sheet count as empty, so
/// the header row is a position in the sheet rather than in its data.
pub fn read_spreadsheet(path: &Path, options: &SpreadsheetOptions) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(options.sheet)
        .ok_or_else(|| IngestError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: options.sheet,
        })?
        .map_err(|e| IngestError::Spreadsheet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or_default();
    let mut grid: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_to_string));
        grid.push(cells);
    }

    let df = build_table(grid, &options.table, path)?;
    info!(
        path = %path.display(),
        sheet = options.sheet,
        rows = df.height(),
        columns = df.width(),
        "Loaded spreadsheet source"
    );
    Ok(df)
}

/// Text of a cell as it would be typed.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(v) => format_numeric(*v),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Float(12.0)), "12");
        assert_eq!(cell_to_string(&Data::Float(0.25)), "0.25");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::String("x".to_string())), "x");
    }

    #[test]
    fn test_not_a_workbook() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"plain text").unwrap();
        let err = read_spreadsheet(file.path(), &SpreadsheetOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Spreadsheet { .. }));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(read_spreadsheet(file.path(), &SpreadsheetOptions::default()).is_err());
    }
}
