//! Processed source artifacts.
//!
//! Each run of a source writes one delimited file
//! `{base}/{product}/{tag}/{tag}_{YYYYMMDD_HHMMSS}.{ext}`. The directory
//! helpers find earlier artifacts by recency or by date.

mod dirs;
mod error;
mod writer;

pub use dirs::{
    artifact_timestamp, ensure_dir, select_close_file_by_date, select_file_by_date,
    select_files, select_recent_file,
};
pub use error::{OutputError, Result};
pub use writer::{ArtifactTarget, write_artifact};
