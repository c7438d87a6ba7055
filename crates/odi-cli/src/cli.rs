//! CLI argument definitions for the `odi` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use odi_cli::logging::LogFormat;
use odi_ingest::DEFAULT_SHEETS_BASE_URL;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "odi",
    version,
    about = "Normalize clinical-trial spreadsheet rows into test, patient and encounter records",
    long_about = "Normalize clinical-trial spreadsheet rows into test, patient and encounter records.\n\n\
                  Rows are read from the first worksheet of a Google Sheets document or a CSV\n\
                  export, grouped by test and patient, and written as JSON."
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

    /// Also append timestamped logs to this file.
    #[arg(long = "log-file", value_name = "PATH", env = "ODI_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Timestamp log lines on stderr as well.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include patient identifiers and birthdates in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch, normalize and export a spreadsheet.
    Normalize(NormalizeArgs),

    /// List the worksheets of a spreadsheet and their row counts.
    Inspect(SourceArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Spreadsheet id (sheets) or path to a CSV file or directory (csv).
    #[arg(value_name = "DOCUMENT")]
    pub document: String,

    /// Where rows come from.
    #[arg(long = "source", value_enum, env = "ODI_SOURCE", default_value = "sheets")]
    pub source: SourceArg,

    /// Google Sheets API key.
    #[arg(
        long = "sheets-api-key",
        value_name = "KEY",
        env = "ODI_SHEETS_API_KEY",
        hide_env_values = true
    )]
    pub sheets_api_key: Option<String>,

    /// Google Sheets service root.
    #[arg(
        long = "sheets-base-url",
        value_name = "URL",
        env = "ODI_SHEETS_BASE_URL",
        default_value = DEFAULT_SHEETS_BASE_URL
    )]
    pub sheets_base_url: String,
}

#[derive(Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write JSON to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Normalize and report without writing any output.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Sheets,
    Csv,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
