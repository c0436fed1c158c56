//! Turning a grid of cells into a dataset.
//!
//! Delimited files and spreadsheets both load as a grid of string cells. The
//! header row, replacement names and multilevel flattening are applied here
//! so both loaders behave the same.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use polars::prelude::{DataFrame, PolarsResult};
use regex::Regex;
use tabclean_common::{frame_from_rows, retain_columns};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Prefix of generated names for header cells left empty.
pub const UNNAMED_PREFIX: &str = "Unnamed";

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4,}").expect("Invalid year regex"));

/// A two-row header: macro groups above, sub-column names below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultilevelHeader {
    /// Prefixes of the macro header cells to keep.
    pub macro_tags: Vec<String>,
    /// Names given to the kept groups, one per macro tag.
    pub micro_tags: Vec<String>,
    /// How to tell apart several groups matching one macro tag (`year`).
    pub duplicated_macro_tag: Option<String>,
}

/// How the first rows of a grid are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Zero-based row holding the column names. `None` numbers the columns.
    pub header_row: Option<usize>,
    /// Names replacing the header.
    pub names: Option<Vec<String>>,
    pub multilevel: Option<MultilevelHeader>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            header_row: Some(0),
            names: None,
            multilevel: None,
        }
    }
}

/// Build a string dataset from a grid of cells.
///
/// Rows above the header row are skipped. Rows wider than the header are
/// dropped and rows narrower than it are padded with empty cells.
pub fn build_table(
    mut grid: Vec<Vec<String>>,
    options: &TableOptions,
    source: &std::path::Path,
) -> Result<DataFrame> {
    let mut header = match options.header_row {
        Some(row) => {
            if row >= grid.len() {
                return Err(IngestError::HeaderRowOutOfRange {
                    path: source.to_path_buf(),
                    header_row: row,
                    rows: grid.len(),
                });
            }
            let mut rest = grid.split_off(row);
            let header = rest.remove(0);
            grid = rest;
            header
        }
        None => {
            let width = grid.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        }
    };

    if let Some(names) = &options.names {
        header.clone_from(names);
    }
    name_empty_cells(&mut header);

    let width = header.len();
    let before = grid.len();
    grid.retain(|row| row.len() <= width || row[width..].iter().all(String::is_empty));
    let dropped = before - grid.len();
    if dropped > 0 {
        warn!(
            path = %source.display(),
            rows = dropped,
            "Dropped rows with more fields than the header"
        );
    }

    let (header, grid) = match &options.multilevel {
        Some(multilevel) => flatten_multilevel(&header, &grid, multilevel)?,
        None => (header, grid),
    };
    let header = dedupe_names(header);

    debug!(
        path = %source.display(),
        rows = grid.len(),
        columns = header.len(),
        "Built table"
    );
    Ok(frame_from_rows(&header, &grid)?)
}

fn name_empty_cells(header: &mut [String]) {
    for (idx, name) in header.iter_mut().enumerate() {
        if name.trim().is_empty() {
            *name = format!("{UNNAMED_PREFIX}: {idx}");
        }
    }
}

/// Suffix repeated names with `.1`, `.2`, ... so every column is addressable.
fn dedupe_names(header: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(header.len());
    let mut out = Vec::with_capacity(header.len());
    for name in header {
        let mut candidate = name.clone();
        let mut count = 0;
        while used.contains(&candidate) {
            count += 1;
            candidate = format!("{name}.{count}");
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Flatten a two-row header into single names.
///
/// Macro header cells group the columns up to the next named cell. For each
/// `(macro_tag, micro_tag)` pair the group whose name starts with the macro
/// tag is kept and its columns are named `{micro_tag}_{sub_name}`, taking the
/// sub names from the first data row. When several groups match and a
/// duplicated macro tag is configured, every matching group is kept and named
/// `{micro_tag}_{sub_name}_{suffix}`, the suffix being the last run of four or
/// more digits in the group name for `year`. Columns outside the kept groups
/// are dropped, as is the sub-name row.
pub fn flatten_multilevel(
    header: &[String],
    rows: &[Vec<String>],
    multilevel: &MultilevelHeader,
) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    if multilevel.macro_tags.len() != multilevel.micro_tags.len() {
        return Err(IngestError::Multilevel {
            reason: format!(
                "{} macro tags but {} micro tags",
                multilevel.macro_tags.len(),
                multilevel.micro_tags.len()
            ),
        });
    }
    let Some((sub_names, data)) = rows.split_first() else {
        return Err(IngestError::Multilevel {
            reason: "no sub-header row below the header".to_string(),
        });
    };

    let named: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.starts_with(UNNAMED_PREFIX))
        .map(|(idx, _)| idx)
        .collect();
    let span = |group: usize| -> Range<usize> {
        let stop = named.get(group + 1).copied().unwrap_or(header.len());
        named[group]..stop
    };
    let sub_name = |idx: usize| sub_names.get(idx).cloned().unwrap_or_default();

    let mut selected: Vec<(usize, String)> = Vec::new();
    for (macro_tag, micro_tag) in multilevel.macro_tags.iter().zip(&multilevel.micro_tags) {
        let groups: Vec<usize> = (0..named.len())
            .filter(|group| header[named[*group]].starts_with(macro_tag.as_str()))
            .collect();

        match (&multilevel.duplicated_macro_tag, groups.as_slice()) {
            (_, []) => {
                warn!(macro_tag = %macro_tag, "No header group starts with the macro tag");
            }
            (Some(duplicated), [_, _, ..]) => {
                for group in &groups {
                    let suffix = if duplicated == "year" {
                        YEAR.find_iter(&header[named[*group]])
                            .last()
                            .map(|found| found.as_str().to_string())
                            .unwrap_or_default()
                    } else {
                        String::new()
                    };
                    for idx in span(*group) {
                        selected.push((idx, format!("{micro_tag}_{}_{suffix}", sub_name(idx))));
                    }
                }
            }
            (_, [.., last]) => {
                for idx in span(*last) {
                    selected.push((idx, format!("{micro_tag}_{}", sub_name(idx))));
                }
            }
        }
    }

    let names = selected.iter().map(|(_, name)| name.clone()).collect();
    let rows = data
        .iter()
        .map(|row| {
            selected
                .iter()
                .map(|(idx, _)| row.get(*idx).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Ok((names, rows))
}

/// Drop the columns whose name contains `unnamed`, in any case.
pub fn remove_unnamed(df: &DataFrame) -> PolarsResult<DataFrame> {
    retain_columns(df, |name| !name.to_lowercase().contains("unnamed"))
}
