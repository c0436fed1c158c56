//! CLI argument definitions for tabclean.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabclean",
    version,
    about = "Standardize and correct tabular sources described by YAML documents",
    long_about = "Standardize and correct tabular sources.\n\n\
                  Each source is described by {params-dir}/{product}/{src_tag}.yaml.\n\
                  A run loads the raw data, repairs malformed contact rows, applies\n\
                  the configured type directives, pseudonymizes sensitive columns\n\
                  and writes a timestamped artifact."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw values (names, phones, emails) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process one source and write a new artifact when it is due.
    Run(RunArgs),

    /// Print the resolved steps of a source without reading any data.
    Check(SourceArgs),
}

#[derive(Parser)]
pub struct SourceArgs {
    /// Tag of the source, the name of its YAML document.
    #[arg(value_name = "SRC_TAG")]
    pub src_tag: String,

    /// Product folder holding the source documents.
    #[arg(long = "product", default_value = "master")]
    pub product: String,

    /// Root directory of the source documents.
    #[arg(long = "params-dir", value_name = "DIR", default_value = "params")]
    pub params_dir: PathBuf,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Process as of this run stamp (YYYYMMDD_HHMMSS), using the newest raw
    /// file not after it. Skips the freshness check.
    #[arg(long = "src-time", value_name = "STAMP")]
    pub src_time: Option<String>,

    /// Read this raw file. Skips the freshness check.
    #[arg(long = "file-path", value_name = "PATH")]
    pub file_path: Option<PathBuf>,

    /// Write the artifact to the `{tag}_{date_part}` partition.
    #[arg(long = "date-part", value_name = "PART")]
    pub date_part: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
