//! Error types for source loading.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while loading a source.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding label not known to the decoder.
    #[error("unsupported encoding '{encoding}' for {path}")]
    UnsupportedEncoding { path: PathBuf, encoding: String },

    // === Parsing Errors ===
    /// Malformed delimited text.
    #[error("failed to parse delimited file {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Delimiter or quote character the reader cannot use.
    #[error("invalid {option} '{value}': expected a single ASCII character")]
    InvalidOption { option: &'static str, value: String },

    /// The configured header row is past the end of the data.
    #[error("header row {header_row} is past the last row ({rows} rows) of {path}")]
    HeaderRowOutOfRange {
        path: PathBuf,
        header_row: usize,
        rows: usize,
    },

    /// Workbook could not be opened or read.
    #[error("failed to read workbook {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// Sheet index past the last sheet.
    #[error("sheet {sheet} not found in {path}")]
    SheetNotFound { path: PathBuf, sheet: usize },

    /// Multilevel header settings do not fit the data.
    #[error("cannot flatten multilevel header: {reason}")]
    Multilevel { reason: String },

    // === Query Errors ===
    #[error("query {query_file} failed: {message}")]
    Query { query_file: PathBuf, message: String },

    // === DataFrame Errors ===
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
