//! ODI spreadsheet normalizer CLI.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use odi_cli::config::load_dotenv;
use odi_cli::logging::{LogConfig, init_logging};
use tracing::{debug, warn};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_inspect, run_normalize};
use crate::summary::print_summary;

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so `.env` values feed clap's env fallbacks.
    let dotenv = load_dotenv();
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(error) => warn!(%error, "ignoring unreadable .env file"),
    }

    let outcome = match &cli.command {
        Command::Normalize(args) => run_normalize(args)
            .await
            .map(|(result, destination)| print_summary(&result, &destination)),
        Command::Inspect(args) => run_inspect(args).await,
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Explicit `--log-level` wins over `-v/-q`; either one disables `RUST_LOG`.
fn log_config(cli: &Cli) -> LogConfig {
    let level_filter = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), Into::into);
    LogConfig {
        level_filter,
        use_env_filter: !cli.verbosity.is_present() && cli.log_level.is_none(),
        with_timestamps: cli.log_timestamps,
        with_ansi: match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stderr().is_terminal(),
        },
        ..LogConfig::default()
    }
    .with_format(cli.log_format.into())
    .with_log_file(cli.log_file.clone())
    .with_log_data(cli.log_data)
}
