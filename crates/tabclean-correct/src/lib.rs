//! Malformed-row correction for delimited contact exports.
//!
//! Contact exports often break their own format: names and addresses contain
//! the delimiter, several phone numbers or addresses share one field, and
//! numbers end up in the email column. [`RowCorrector`] repairs the raw lines
//! of such a source before it becomes a dataset:
//!
//! 1. delimiters quoted between escape characters are removed
//! 2. numbers typed into the email field of over-wide rows move to rows of
//!    their own
//! 3. phone fields are split into one number per row
//! 4. email fields are split into one address per row
//! 5. names broken by a delimiter are merged back
//!
//! Rows that still do not fit the configured header are padded or truncated.
//! Every repair is counted in a [`CorrectionReport`].

mod corrector;
mod email;
mod error;
mod phone;
mod report;

pub use corrector::{RowCorrector, remove_escaped_delimiters};
pub use email::{EMAIL_SUFFIXES, split_emails};
pub use error::{CorrectError, Result};
pub use phone::split_phone_numbers;
pub use report::CorrectionReport;
