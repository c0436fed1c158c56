//! Column pseudonymization.
//!
//! Sensitive columns are replaced by random identifiers. The mapping from raw
//! value to identifier is kept in persisted key tables so that the same raw
//! value gets the same identifier in every run.

mod error;
mod pseudonymize;
mod store;

pub use error::{MaskError, Result};
pub use pseudonymize::{MaskReport, MaskedColumn, pseudonymize};
pub use store::{KeyTableStore, KeyTableTransaction};
