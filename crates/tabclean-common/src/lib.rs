//! Shared utilities for tabclean crates.

mod encoding;
mod frame;
mod polars;

pub use encoding::{is_utf8_sig, resolve_encoding};
pub use frame::{frame_from_rows, rename_columns, replace_string_column, retain_columns};
pub use polars::{
    any_to_string, column_names, column_optional_strings, column_strings, format_numeric,
};
