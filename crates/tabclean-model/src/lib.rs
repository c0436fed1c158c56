//! Shared types for tabclean.
//!
//! - [`tag`]: configuration type tags and standardizer kinds
//! - [`directive`]: resolved column directives and their options
//! - [`source`]: contact positions and pseudonymization settings
//! - [`freshness`]: refresh cadence and the reprocessing decision
//! - [`timestamp`]: run timestamp format shared by artifacts and dates

pub mod directive;
mod error;
pub mod freshness;
pub mod source;
pub mod tag;
pub mod timestamp;

pub use directive::{
    ColumnSelection, ColumnTypeDirective, DateFormatChoice, DateOptions, DecimalSeparator,
    DirectiveOptions, RenameOptions, split_column_list,
};
pub use error::{ModelError, Result};
pub use freshness::{Cadence, CadenceUnit, FreshnessDecision, should_reprocess};
pub use source::{ContactPositions, MaskColumn, MaskSettings, RawLine, parse_tag_list};
pub use tag::{TypeKind, TypeTag};
pub use timestamp::{RUN_TIMESTAMP_FORMAT, format_run_timestamp, parse_run_timestamp};
