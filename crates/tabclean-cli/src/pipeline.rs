//! End-to-end processing of one source.
//!
//! A run loads the source document, checks whether the last artifact is
//! still fresh, loads the raw data (through the row corrector when the
//! document configures contact positions), applies the planned directives
//! and writes a new artifact.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDateTime;
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, trace, warn};

use tabclean_common::{any_to_string, column_names, rename_columns};
use tabclean_config::{
    LoadParameters, PlannedStep, ResolvedSource, SaveType, SourceConfig, SourceKind,
    audit_column_coverage, describe_step, load_source_config, plan_directives, resolve_source,
    source_config_path,
};
use tabclean_correct::{CorrectionReport, RowCorrector};
use tabclean_ingest::{
    DelimitedOptions, MultilevelHeader, QuerySource, SpreadsheetOptions, TableOptions,
    fetch_query_table, read_delimited_table, read_raw_lines, read_spreadsheet, remove_unnamed,
};
use tabclean_mask::pseudonymize;
use tabclean_model::{Cadence, ContactPositions, TypeTag, format_run_timestamp, parse_run_timestamp};
use tabclean_output::{
    ArtifactTarget, artifact_timestamp, ensure_dir, select_close_file_by_date, select_recent_file,
    write_artifact,
};
use tabclean_standardize::apply_directive;

use crate::logging::redact_value;

/// Encoding of raw exports read line by line when none is configured.
const DEFAULT_LINE_ENCODING: &str = "ANSI";
const DEFAULT_ENCODING: &str = "UTF-8";
const DEFAULT_DELIMITER: &str = ",";
const DEFAULT_QUOTE: &str = "\"";

/// What to process and when.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub src_tag: String,
    pub product: String,
    /// Root of the per-product source documents.
    pub params_dir: PathBuf,
    /// Reprocess as of this `YYYYMMDD_HHMMSS` stamp instead of now.
    pub src_time: Option<String>,
    /// Read this raw file instead of looking one up.
    pub file_path: Option<PathBuf>,
    /// Write the artifact to the `{tag}_{date_part}` partition.
    pub date_part: Option<String>,
    pub now: NaiveDateTime,
}

impl RunRequest {
    pub fn new(
        src_tag: impl Into<String>,
        product: impl Into<String>,
        params_dir: impl Into<PathBuf>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            src_tag: src_tag.into(),
            product: product.into(),
            params_dir: params_dir.into(),
            src_time: None,
            file_path: None,
            date_part: None,
            now,
        }
    }

    /// Explicit runs bypass the freshness gate.
    fn is_scheduled(&self) -> bool {
        self.src_time.is_none() && self.file_path.is_none()
    }
}

/// Result of one applied step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSummary {
    pub description: String,
    pub columns: usize,
    pub parse_errors: usize,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Processed {
        /// `None` when the source is saved as a table.
        artifact: Option<PathBuf>,
        rows: usize,
        columns: usize,
        /// Malformed raw lines the row corrector could not repair.
        correction_errors: usize,
        /// Dataset columns claimed by no type tag.
        unclassified_columns: usize,
        steps: Vec<StepSummary>,
    },
    Skipped {
        last_artifact: PathBuf,
        last_update: NaiveDateTime,
    },
}

/// The resolved steps of a source, without touching any data.
#[derive(Debug, Clone)]
pub struct SourcePlan {
    pub config_path: PathBuf,
    pub kind: SourceKind,
    pub corrected: bool,
    pub cadence: Cadence,
    pub steps: Vec<PlannedStep>,
}

/// Load and resolve a source document and plan its steps.
///
/// Wildcards stay unexpanded because no dataset header is known.
pub fn plan_source(params_dir: &Path, product: &str, src_tag: &str) -> Result<SourcePlan> {
    let config_path = source_config_path(params_dir, product, src_tag);
    let config = load_source_config(&config_path).context("load source configuration")?;
    let resolved = resolve_source(&config).context("resolve source configuration")?;
    let steps = plan_directives(&resolved.data_types, resolved.decimal, resolved.mask.as_ref());
    Ok(SourcePlan {
        config_path,
        kind: config.raw_source.source_type.specifics,
        corrected: config.quality().is_some(),
        cadence: resolved.cadence,
        steps,
    })
}

/// Process one source end to end.
///
/// `query` serves sources of kind `query`; file sources never use it.
pub fn run_source(request: &RunRequest, query: Option<&dyn QuerySource>) -> Result<RunOutcome> {
    let span = info_span!("source", src_tag = %request.src_tag, product = %request.product);
    let _guard = span.enter();
    let start = Instant::now();

    let run_time = match &request.src_time {
        Some(text) => parse_run_timestamp(text).context("parse --src-time")?,
        None => request.now,
    };

    // =========================================================================
    // Stage 1: Configuration
    // =========================================================================
    let config_path = source_config_path(&request.params_dir, &request.product, &request.src_tag);
    let config = load_source_config(&config_path).context("load source configuration")?;
    let mut resolved = resolve_source(&config).context("resolve source configuration")?;
    let target = artifact_target(&config, request);

    // =========================================================================
    // Stage 2: Freshness
    // =========================================================================
    let tag_dir = ensure_dir(&target.tag_dir(), &[]).context("prepare artifact directory")?;
    if request.is_scheduled()
        && let Some(last_artifact) =
            select_recent_file(&tag_dir, &target.tag).context("look up previous artifact")?
    {
        let last_update = artifact_timestamp(&last_artifact, &target.tag)
            .context("read previous artifact timestamp")?;
        info!(last_update = %format_run_timestamp(&last_update), "Previous artifact found");
        if !resolved.cadence.decide(last_update, run_time).should_reprocess {
            info!(
                artifact = %last_artifact.display(),
                cadence = %resolved.cadence,
                "Source is up to date"
            );
            return Ok(RunOutcome::Skipped {
                last_artifact,
                last_update,
            });
        }
    }

    // =========================================================================
    // Stage 3: Load
    // =========================================================================
    let (mut df, corrections) =
        load_dataset(&config, &resolved, request, query).context("load raw source")?;
    let header: Vec<String> = column_names(&df)
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    rename_columns(&mut df, &header).context("trim column names")?;
    info!(rows = df.height(), columns = df.width(), "Loaded raw source");
    if let Some(preview) = first_row_preview(&df) {
        trace!(first_row = %redact_value(&preview), "First loaded row");
    }

    // =========================================================================
    // Stage 4: Wildcards and coverage
    // =========================================================================
    resolved.data_types.expand_wildcards(&header);
    let coverage = audit_column_coverage(&resolved.data_types, &header);

    // =========================================================================
    // Stage 5: Directives
    // =========================================================================
    let plan = plan_directives(&resolved.data_types, resolved.decimal, resolved.mask.as_ref());
    let mut steps = Vec::with_capacity(plan.len());
    for step in &plan {
        let description = describe_step(step);
        debug!(step = %description, "Applying step");
        let summary = match step {
            PlannedStep::Standardize(directive) => {
                let outcome = apply_directive(&mut df, directive)
                    .with_context(|| format!("apply {} directive", directive.tag))?;
                if outcome.parse_errors > 0 {
                    warn!(
                        tag = %directive.tag,
                        parse_errors = outcome.parse_errors,
                        "Values could not be parsed"
                    );
                }
                StepSummary {
                    description,
                    columns: outcome.columns.len(),
                    parse_errors: outcome.parse_errors,
                }
            }
            PlannedStep::Mask(settings) => {
                let report = pseudonymize(&mut df, settings).context("pseudonymize columns")?;
                StepSummary {
                    description,
                    columns: report.columns.len(),
                    parse_errors: 0,
                }
            }
        };
        steps.push(summary);
    }

    // =========================================================================
    // Stage 6: Save
    // =========================================================================
    let artifact = match config.processed_source.save_type {
        SaveType::File => Some(write_artifact(&df, &target, &run_time).context("write artifact")?),
        SaveType::Table => {
            warn!("Save type `table` has no writer, the processed dataset is not persisted");
            None
        }
    };

    info!(
        rows = df.height(),
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "Source processed"
    );
    Ok(RunOutcome::Processed {
        artifact,
        rows: df.height(),
        columns: df.width(),
        correction_errors: corrections
            .as_ref()
            .map_or(0, CorrectionReport::error_count),
        unclassified_columns: coverage.unclassified.len(),
        steps,
    })
}

fn artifact_target(config: &SourceConfig, request: &RunRequest) -> ArtifactTarget {
    let save = &config.processed_source.save_parameters;
    ArtifactTarget {
        base: save.path.clone(),
        product: request.product.clone(),
        tag: save.tag.clone(),
        date_part: request.date_part.clone(),
        file_type: save.file_type.clone(),
        delimiter: save.delimiter.clone(),
        encoding: save.encoding.clone(),
    }
}

fn load_dataset(
    config: &SourceConfig,
    resolved: &ResolvedSource,
    request: &RunRequest,
    query: Option<&dyn QuerySource>,
) -> Result<(DataFrame, Option<CorrectionReport>)> {
    let load = &config.raw_source.load_parameters;
    if let Some(positions) = config.quality() {
        let (df, report) = correct_raw_lines(load, positions, resolved, request)?;
        return Ok((df, Some(report)));
    }
    let df = match config.raw_source.source_type.specifics {
        SourceKind::File => load_file(load, resolved, config.multilevel(), request)?,
        SourceKind::Query => load_query(load, resolved, query)?,
    };
    Ok((df, None))
}

fn correct_raw_lines(
    load: &LoadParameters,
    positions: &ContactPositions,
    resolved: &ResolvedSource,
    request: &RunRequest,
) -> Result<(DataFrame, CorrectionReport)> {
    let path = match &request.file_path {
        Some(path) => existing_file(path)?,
        None => {
            let file_type = load
                .file_type
                .ok_or_else(|| missing_parameter("file_type"))?;
            required_dir(load)?.join(format!(
                "{}.{}",
                required_name(load)?,
                file_type.extension()
            ))
        }
    };
    let delimiter = load
        .delimiter
        .as_deref()
        .ok_or_else(|| missing_parameter("delimiter"))?;
    let escape = load
        .special_char
        .as_deref()
        .and_then(|value| value.chars().next());
    let header = resolved
        .data_types
        .columns(TypeTag::Names)
        .map(<[String]>::to_vec)
        .ok_or_else(|| anyhow!("data_types.names is required to correct raw lines"))?;

    let lines = read_raw_lines(&path, load.encoding.as_deref().unwrap_or(DEFAULT_LINE_ENCODING))?;
    let corrector = RowCorrector::new(positions.clone(), delimiter, escape, header)?;
    let (df, report) = corrector.correct(&lines)?;
    info!(
        path = %path.display(),
        lines = report.lines_read,
        rows = report.rows_out,
        rows_added = report.rows_added(),
        "Corrected raw lines"
    );
    if report.error_count() > 0 {
        warn!(
            correction_errors = report.error_count(),
            "Raw lines with structural problems were kept after padding or truncation"
        );
    }
    Ok((df, report))
}

fn load_file(
    load: &LoadParameters,
    resolved: &ResolvedSource,
    multilevel: bool,
    request: &RunRequest,
) -> Result<DataFrame> {
    let file_type = load
        .file_type
        .ok_or_else(|| missing_parameter("file_type"))?;
    let path = locate_raw_file(load, file_type.extension(), request)?;

    let names = if load.change_col_names {
        resolved
            .data_types
            .columns(TypeTag::Names)
            .map(<[String]>::to_vec)
    } else {
        None
    };
    let multilevel = multilevel.then(|| MultilevelHeader {
        macro_tags: owned_columns(resolved, TypeTag::MacroTagsNames),
        micro_tags: owned_columns(resolved, TypeTag::MicroTagsNames),
        duplicated_macro_tag: resolved.data_types.duplicated_macro_tag.clone(),
    });
    let table = TableOptions {
        header_row: load.header_row,
        names,
        multilevel,
    };

    let df = if file_type.is_spreadsheet() {
        read_spreadsheet(
            &path,
            &SpreadsheetOptions {
                sheet: load.sheet_number,
                table,
            },
        )?
    } else {
        let options = DelimitedOptions::new(
            load.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER),
            Some(load.special_char.as_deref().unwrap_or(DEFAULT_QUOTE)),
            load.encoding.as_deref().unwrap_or(DEFAULT_ENCODING),
        )?
        .with_table(table);
        read_delimited_table(&path, &options)?
    };
    Ok(remove_unnamed(&df)?)
}

/// The raw file of a run: the explicit path, the newest export, or the newest
/// export not after `--src-time`.
fn locate_raw_file(load: &LoadParameters, extension: &str, request: &RunRequest) -> Result<PathBuf> {
    if let Some(path) = &request.file_path {
        return existing_file(path);
    }
    let dir = required_dir(load)?;
    let prefix = required_name(load)?;
    let found = match &request.src_time {
        None => select_recent_file(dir, prefix)?,
        Some(limit) => select_close_file_by_date(dir, prefix, limit, extension)?,
    };
    let path =
        found.ok_or_else(|| anyhow!("no raw file starting with `{prefix}` in {}", dir.display()))?;
    debug!(path = %path.display(), "Selected raw file");
    Ok(path)
}

fn load_query(
    load: &LoadParameters,
    resolved: &ResolvedSource,
    query: Option<&dyn QuerySource>,
) -> Result<DataFrame> {
    let query = query.ok_or_else(|| anyhow!("source is read from a query but no query source is available"))?;
    let query_file = load
        .query_file
        .as_deref()
        .ok_or_else(|| missing_parameter("query_file"))?;
    let columns = resolved
        .data_types
        .columns(TypeTag::Names)
        .ok_or_else(|| anyhow!("data_types.names is required for query sources"))?;
    Ok(fetch_query_table(query, Path::new(query_file), columns)?)
}

fn existing_file(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        bail!("raw file {} does not exist", path.display());
    }
    Ok(path.to_path_buf())
}

fn required_dir(load: &LoadParameters) -> Result<&Path> {
    load.path.as_deref().ok_or_else(|| missing_parameter("path"))
}

fn required_name(load: &LoadParameters) -> Result<&str> {
    load.file_name
        .as_deref()
        .ok_or_else(|| missing_parameter("file_name"))
}

fn missing_parameter(key: &str) -> anyhow::Error {
    anyhow!("raw_source.load_parameters.{key} is required")
}

fn owned_columns(resolved: &ResolvedSource, tag: TypeTag) -> Vec<String> {
    resolved
        .data_types
        .columns(tag)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

fn first_row_preview(df: &DataFrame) -> Option<String> {
    if df.height() == 0 {
        return None;
    }
    let cells: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| column.get(0).map(any_to_string).unwrap_or_default())
        .collect();
    Some(cells.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_explicit_runs_bypass_freshness() {
        let mut request = RunRequest::new("clients", "master", "params", now());
        assert!(request.is_scheduled());
        request.src_time = Some("20240101_000000".to_string());
        assert!(!request.is_scheduled());
        request.src_time = None;
        request.file_path = Some(PathBuf::from("raw/clients.csv"));
        assert!(!request.is_scheduled());
    }

    #[test]
    fn test_first_row_preview() {
        use polars::prelude::{IntoColumn, NamedFrom, Series};

        let df = DataFrame::new(vec![
            Series::new("a".into(), vec!["1", "2"]).into_column(),
            Series::new("b".into(), vec![Some("x"), None]).into_column(),
        ])
        .unwrap();
        assert_eq!(first_row_preview(&df).as_deref(), Some("1|x"));
        assert_eq!(first_row_preview(&df.head(Some(0))), None);
    }

    #[test]
    fn test_missing_parameter_message() {
        assert_eq!(
            missing_parameter("delimiter").to_string(),
            "raw_source.load_parameters.delimiter is required"
        );
    }
}
