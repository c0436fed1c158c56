//! The row correction pipeline.
//!
//! Every step reads the whole row list, collects the rows it wants to add and
//! appends them once the pass is over, so no step grows the list it is
//! iterating.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tabclean_common::frame_from_rows;
use tabclean_model::{ContactPositions, RawLine};
use tracing::{debug, error, info};

use crate::email::split_emails;
use crate::error::{CorrectError, Result};
use crate::phone::split_phone_numbers;
use crate::report::CorrectionReport;

/// Rows with more fields than this are checked for a split name.
const NAME_MERGE_MIN_FIELDS: usize = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    /// Source line the row came from.
    line: usize,
    fields: Vec<String>,
}

/// Repairs contact exports whose rows were broken by unescaped delimiters and
/// multi-valued phone or email fields.
#[derive(Debug, Clone)]
pub struct RowCorrector {
    positions: ContactPositions,
    content_after_name: Option<Vec<String>>,
    delimiter: String,
    escape: Option<char>,
    header: Vec<String>,
}

impl RowCorrector {
    /// Create a corrector producing rows under `header`.
    pub fn new(
        positions: ContactPositions,
        delimiter: impl Into<String>,
        escape: Option<char>,
        header: Vec<String>,
    ) -> Result<Self> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(CorrectError::InvalidSettings {
                reason: "delimiter is empty".to_string(),
            });
        }
        if header.is_empty() {
            return Err(CorrectError::InvalidSettings {
                reason: "configured header has no columns".to_string(),
            });
        }
        if let Some(escape) = escape
            && delimiter.contains(escape)
        {
            return Err(CorrectError::InvalidSettings {
                reason: format!("escape character '{escape}' is part of the delimiter"),
            });
        }
        let content_after_name = positions.content_after_name();
        Ok(Self {
            positions,
            content_after_name,
            delimiter,
            escape,
            header,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Correct the lines of a source and build a dataset under the configured
    /// header. The first line is the file's own header and is not part of the
    /// data.
    pub fn correct(&self, lines: &[RawLine]) -> Result<(DataFrame, CorrectionReport)> {
        let (rows, report) = self.correct_rows(lines)?;
        let df = frame_from_rows(&self.header, &rows)?;
        Ok((df, report))
    }

    /// Correct the lines of a source, returning the fields of every data row.
    pub fn correct_rows(&self, lines: &[RawLine]) -> Result<(Vec<Vec<String>>, CorrectionReport)> {
        let Some((file_header, body)) = lines.split_first() else {
            return Err(CorrectError::EmptySource);
        };
        let mut report = CorrectionReport {
            lines_read: body.len(),
            ..CorrectionReport::default()
        };

        let mut rows = self.realign(file_header, body, &mut report);
        self.reconcile(&mut rows, &mut report);

        let phone_position = self.positions.phone_position;
        report.phone_rows = self.expand_field(&mut rows, phone_position, |field| {
            (split_phone_numbers(field), false)
        });
        let email_position = self.positions.email_position;
        let mut cleared = 0;
        report.email_rows = self.expand_field(&mut rows, email_position, |field| {
            let emails = split_emails(field);
            if emails.is_empty() && !field.is_empty() {
                cleared += 1;
            }
            (emails, true)
        });
        report.emails_cleared = cleared;

        self.merge_names(&mut rows, &mut report);
        let fields = self.fit_to_header(rows, &mut report);
        report.rows_out = fields.len();

        info!(
            lines = report.lines_read,
            rows = report.rows_out,
            added = report.rows_added(),
            errors = report.error_count(),
            "Corrected source rows"
        );
        Ok((fields, report))
    }

    /// Split every line, dropping delimiters quoted between escape characters.
    fn realign(&self, file_header: &RawLine, body: &[RawLine], report: &mut CorrectionReport) -> Vec<Row> {
        let expected = self.split_fields(&file_header.text).len();
        body.iter()
            .map(|line| {
                let fields = self.split_fields(&line.text);
                if fields.len() != expected {
                    error!(
                        line = line.index,
                        fields = fields.len(),
                        expected,
                        "Row has the wrong number of columns after realignment"
                    );
                    report.realignment_errors += 1;
                }
                Row {
                    line: line.index,
                    fields,
                }
            })
            .collect()
    }

    fn split_fields(&self, text: &str) -> Vec<String> {
        let text = match self.escape {
            Some(escape) => remove_escaped_delimiters(text, &self.delimiter, escape),
            None => text.to_string(),
        };
        text.split(self.delimiter.as_str())
            .map(str::to_string)
            .collect()
    }

    /// Move phone numbers typed into the email field of over-wide rows back
    /// into rows of their own.
    fn reconcile(&self, rows: &mut Vec<Row>, report: &mut CorrectionReport) {
        let width = self.header.len();
        let email_position = self.positions.email_position;
        let phone_position = self.positions.phone_position;
        let mut seen: HashMap<String, Vec<String>> = HashMap::new();
        let mut added: Vec<Row> = Vec::new();

        for row in rows.iter_mut() {
            let surplus = row.fields.len().saturating_sub(width);
            if surplus == 0 {
                continue;
            }

            let mut recovered: Vec<String> = Vec::new();
            for _ in 0..surplus {
                let Some(email) = row.fields.get_mut(email_position) else {
                    break;
                };
                if email.contains('@') {
                    break;
                }
                email.retain(|ch| ch != ' ');
                if !is_digits(email) {
                    break;
                }
                recovered.push(row.fields.remove(email_position));
                report.phones_recovered += 1;
            }

            let entity = self.entity(row);
            let known = seen.entry(entity).or_default();
            if let Some(phone) = row.fields.get(phone_position)
                && !phone.is_empty()
                && !known.contains(phone)
            {
                known.push(phone.clone());
            }
            for number in recovered {
                if known.contains(&number) {
                    continue;
                }
                let mut extra = row.clone();
                if let Some(phone) = extra.fields.get_mut(phone_position) {
                    phone.clone_from(&number);
                }
                known.push(number);
                added.push(extra);
            }
        }

        report.reconciled_rows = added.len();
        rows.extend(added);

        for row in rows.iter() {
            if row.fields.len() != width {
                error!(
                    line = row.line,
                    fields = row.fields.len(),
                    expected = width,
                    "Row width does not match the configured header"
                );
                report.unreconciled_rows += 1;
            }
        }
        if report.unreconciled_rows == 0 {
            debug!("Every row matches the configured header width");
        }
    }

    /// Replace a multi-valued field by its first value and add one row per
    /// further value not yet emitted for the row's entity.
    ///
    /// `extract` returns the values and whether an empty result clears the
    /// field. Returns the number of rows added.
    fn expand_field<F>(&self, rows: &mut Vec<Row>, position: usize, mut extract: F) -> usize
    where
        F: FnMut(&str) -> (Vec<String>, bool),
    {
        let mut emitted: HashMap<String, Vec<String>> = HashMap::new();
        let mut added: Vec<Row> = Vec::new();

        for row in rows.iter_mut() {
            let Some(field) = row.fields.get_mut(position) else {
                continue;
            };
            let (values, clear_when_empty) = extract(field);
            let mut values = values.into_iter();
            let Some(first) = values.next() else {
                if clear_when_empty {
                    field.clear();
                }
                continue;
            };
            field.clone_from(&first);

            let rest: Vec<String> = values.collect();
            if rest.is_empty() {
                continue;
            }
            let entity = self.entity(row);
            let known = emitted.entry(entity).or_default();
            if !known.contains(&first) {
                known.push(first);
            }
            for value in rest {
                if known.contains(&value) {
                    continue;
                }
                let mut extra = row.clone();
                extra.fields[position].clone_from(&value);
                known.push(value);
                added.push(extra);
            }
        }

        let count = added.len();
        rows.extend(added);
        count
    }

    /// Rejoin a name that an unescaped delimiter split in two.
    fn merge_names(&self, rows: &mut [Row], report: &mut CorrectionReport) {
        let Some(allowed) = &self.content_after_name else {
            return;
        };
        let name_position = self.positions.name_position;
        for row in rows.iter_mut() {
            if row.fields.len() <= NAME_MERGE_MIN_FIELDS {
                continue;
            }
            let Some(next) = row.fields.get(name_position + 1) else {
                continue;
            };
            if allowed.contains(next) {
                continue;
            }
            let next = row.fields.remove(name_position + 1);
            let name = &mut row.fields[name_position];
            name.push(' ');
            name.push_str(&next);
            report.name_merges += 1;
        }
    }

    /// Pad or truncate every row to the configured header width.
    fn fit_to_header(&self, rows: Vec<Row>, report: &mut CorrectionReport) -> Vec<Vec<String>> {
        let width = self.header.len();
        rows.into_iter()
            .map(|mut row| {
                trim_row_edges(&mut row.fields);
                if row.fields.len() != width {
                    error!(
                        line = row.line,
                        fields = row.fields.len(),
                        expected = width,
                        "Row padded or truncated to the configured header"
                    );
                    report.width_adjusted += 1;
                    row.fields.resize(width, String::new());
                }
                row.fields
            })
            .collect()
    }

    fn entity(&self, row: &Row) -> String {
        row.fields
            .get(self.positions.id_position)
            .cloned()
            .unwrap_or_default()
    }
}

/// Remove every delimiter enclosed by a pair of escape characters. Escape
/// characters pair up in order; an unpaired trailing one is left alone.
pub fn remove_escaped_delimiters(line: &str, delimiter: &str, escape: char) -> String {
    let marks: Vec<usize> = line
        .char_indices()
        .filter(|(_, ch)| *ch == escape)
        .map(|(idx, _)| idx)
        .collect();

    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for pair in marks.chunks_exact(2) {
        let (open, close) = (pair[0], pair[1]);
        out.push_str(&line[cursor..open]);
        out.push_str(&line[open..close].replace(delimiter, ""));
        cursor = close;
    }
    out.push_str(&line[cursor..]);
    out
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Strip the whitespace surrounding the whole line.
fn trim_row_edges(fields: &mut [String]) {
    if let Some(first) = fields.first_mut() {
        let trimmed = first.trim_start();
        if trimmed.len() != first.len() {
            *first = trimmed.to_string();
        }
    }
    if let Some(last) = fields.last_mut() {
        let trimmed_len = last.trim_end().len();
        last.truncate(trimmed_len);
    }
}
