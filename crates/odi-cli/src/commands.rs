use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use odi_cli::config::{ConfiguredSource, SourceConfig, SourceKind};
use odi_cli::pipeline::{PipelineResult, run_pipeline};
use odi_ingest::{RowSource, SheetsConfig};
use odi_output::{JsonSink, JsonTarget, MemorySink, RecordSink};
use tracing::info;

use crate::cli::{NormalizeArgs, SourceArg, SourceArgs};
use crate::summary::print_worksheets;

/// Where normalized records end up.
#[derive(Debug, Clone)]
pub enum Destination {
    DryRun,
    Stdout,
    File(PathBuf),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryRun => f.write_str("(dry run, nothing written)"),
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub async fn run_normalize(args: &NormalizeArgs) -> Result<(PipelineResult, Destination)> {
    let source = build_source(&args.source)?;
    let destination = match (&args.output, args.dry_run) {
        (_, true) => Destination::DryRun,
        (Some(path), false) => Destination::File(path.clone()),
        (None, false) => Destination::Stdout,
    };
    let mut sink: Box<dyn RecordSink> = match &destination {
        Destination::DryRun => Box::new(MemorySink::new()),
        Destination::Stdout => Box::new(JsonSink::new(JsonTarget::Stdout)),
        Destination::File(path) => Box::new(JsonSink::new(JsonTarget::File(path.clone()))),
    };
    let result = run_pipeline(&source, &args.source.document, sink.as_mut()).await?;
    info!(output = %destination, "normalization finished");
    Ok((result, destination))
}

pub async fn run_inspect(args: &SourceArgs) -> Result<()> {
    let source = build_source(args)?;
    let spreadsheet = source
        .fetch(&args.document)
        .await
        .with_context(|| format!("failed to retrieve '{}'", args.document))?;
    print_worksheets(&spreadsheet);
    Ok(())
}

fn build_source(args: &SourceArgs) -> Result<ConfiguredSource> {
    let config = SourceConfig {
        kind: match args.source {
            SourceArg::Sheets => SourceKind::Sheets,
            SourceArg::Csv => SourceKind::Csv,
        },
        sheets: SheetsConfig {
            api_key: args.sheets_api_key.clone(),
            base_url: args.sheets_base_url.clone(),
            ..SheetsConfig::default()
        },
    };
    config.build().context("invalid source configuration")
}
