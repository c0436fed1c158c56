//! Source loading.
//!
//! Every loader produces string columns; typing is left to the
//! standardizers. Supported sources:
//!
//! - raw lines for the row corrector ([`read_raw_lines`])
//! - delimited text ([`read_delimited_table`])
//! - `xlsx`/`xls` workbooks, optionally with a multilevel header
//!   ([`read_spreadsheet`])
//! - database queries through a caller-supplied [`QuerySource`]

mod delimited;
mod encoding;
mod error;
mod lines;
mod query;
mod spreadsheet;
mod table;

pub use delimited::{DelimitedOptions, read_delimited_table};
pub use encoding::{decode_bytes, read_text};
pub use error::{IngestError, Result};
pub use lines::read_raw_lines;
pub use query::{QuerySource, fetch_query_table};
pub use spreadsheet::{SpreadsheetOptions, cell_to_string, read_spreadsheet};
pub use table::{
    MultilevelHeader, TableOptions, UNNAMED_PREFIX, build_table, flatten_multilevel,
    remove_unnamed,
};
