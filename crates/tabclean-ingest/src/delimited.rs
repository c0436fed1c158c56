//! Delimited text loading.

use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::DataFrame;
use tracing::info;

use crate::encoding::read_text;
use crate::error::{IngestError, Result};
use crate::table::{TableOptions, build_table};

/// Settings for reading a delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedOptions {
    pub delimiter: u8,
    /// Quote character. `None` reads quotes as ordinary text.
    pub quote: Option<u8>,
    /// Encoding label, see [`tabclean_common::resolve_encoding`].
    pub encoding: String,
    pub table: TableOptions,
}

impl DelimitedOptions {
    /// Build options from configured characters. An empty quote disables
    /// quoting.
    pub fn new(delimiter: &str, quote: Option<&str>, encoding: impl Into<String>) -> Result<Self> {
        let delimiter = single_byte("delimiter", delimiter)?;
        let quote = match quote {
            Some(quote) if !quote.is_empty() => Some(single_byte("quote character", quote)?),
            _ => None,
        };
        Ok(Self {
            delimiter,
            quote,
            encoding: encoding.into(),
            table: TableOptions::default(),
        })
    }

    #[must_use]
    pub fn with_table(mut self, table: TableOptions) -> Self {
        self.table = table;
        self
    }
}

fn single_byte(option: &'static str, value: &str) -> Result<u8> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(IngestError::InvalidOption {
            option,
            value: value.to_string(),
        }),
    }
}

/// Read a delimited file with every cell as a string.
pub fn read_delimited_table(path: &Path, options: &DelimitedOptions) -> Result<DataFrame> {
    let text = read_text(path, &options.encoding)?;

    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter);
    match options.quote {
        Some(quote) => builder.quote(quote),
        None => builder.quoting(false),
    };

    let mut reader = builder.from_reader(text.as_bytes());
    let mut grid: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        grid.push(record.iter().map(str::to_string).collect());
    }

    let df = build_table(grid, &options.table, path)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded delimited source"
    );
    Ok(df)
}
