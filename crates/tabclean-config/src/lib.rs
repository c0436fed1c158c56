//! Source configuration for tabclean.
//!
//! A source is described by one YAML document. This crate reads it, resolves
//! its `data_types` section into normalized column lists, expands wildcard
//! column references against the loaded header, audits column coverage and
//! plans the ordered standardization steps.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabclean_config::{load_source_config, plan_directives, resolve_source, source_config_path};
//!
//! let path = source_config_path(Path::new("params"), "master", "clients");
//! let config = load_source_config(&path)?;
//! let mut resolved = resolve_source(&config)?;
//! resolved.data_types.expand_wildcards(&header);
//! let steps = plan_directives(&resolved.data_types, resolved.decimal, resolved.mask.as_ref());
//! ```

mod audit;
mod document;
mod error;
mod load;
mod plan;
mod resolve;
mod source;
mod wildcard;

pub use audit::{CoverageReport, audit_column_coverage};
pub use document::{
    ConfFile, FileType, LoadParameters, ProcessedSource, RawSource, SaveParameters, SaveType,
    SourceConfig, SourceKind, SourceType,
};
pub use error::{ConfigError, ConfigIssue, Result};
pub use load::{load_source_config, parse_source_config, source_config_path};
pub use plan::{PlannedStep, describe_step, plan_directives, render_plan};
pub use resolve::{DataTypes, DateSection, normalize_column_string, resolve_data_types};
pub use source::{ResolvedSource, resolve_source};
pub use wildcard::{WILDCARD_SUFFIX, expand_wildcards, wildcard_prefix};
