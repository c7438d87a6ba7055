//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: Fatal errors
//! - `warn`: Non-fatal issues (duplicate headers, skipped files)
//! - `info`: Pipeline stage progress, summary counts
//! - `debug`: Per-test details, HTTP requests
//! - `trace`: Per-patient details (identifiers redacted unless `--log-data`)
//!
//! Events always go to stderr. With a log file configured they are also
//! appended to the file, timestamped as `YYYY-MM-DD HH:MM:SS` local time.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::{FmtSpan, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when patient-level logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns true if patient-level values may be logged.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input value when PHI logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the workspace crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may replace the default filter.
    pub use_env_filter: bool,
    /// Timestamp stderr output too. File output is always timestamped.
    pub with_timestamps: bool,
    /// Whether to use ANSI colors on stderr.
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Optional log file, appended to in addition to stderr.
    pub log_file: Option<PathBuf>,
    /// Whether patient identifiers and birthdates may be logged.
    pub log_data: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::INFO,
            use_env_filter: true,
            with_timestamps: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    #[must_use]
    pub fn with_log_data(mut self, enable: bool) -> Self {
        self.log_data = enable;
        self
    }
}

/// Initialize the global tracing subscriber with the given configuration.
///
/// This should be called once at application startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let file = config.log_file.as_deref().map(open_log_file).transpose()?;
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Release);
    build_subscriber(config, io::stderr, file).init();
    Ok(())
}

/// Build the subscriber: `console` always, `file` when given.
pub fn build_subscriber<C, F>(
    config: &LogConfig,
    console: C,
    file: Option<F>,
) -> impl Subscriber + Send + Sync + 'static
where
    C: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    F: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let mut layers = vec![fmt_layer(
        config.format,
        console,
        config.with_ansi,
        config.with_timestamps,
    )];
    if let Some(file) = file {
        layers.push(fmt_layer(config.format, file, false, true));
    }
    tracing_subscriber::registry()
        .with(layers)
        .with(build_env_filter(config))
}

fn fmt_layer<W>(
    format: LogFormat,
    writer: W,
    ansi: bool,
    timestamps: bool,
) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi && format != LogFormat::Json)
        .with_target(false);
    match (format, timestamps) {
        (LogFormat::Json, true) => layer
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(LocalTimestamp)
            .boxed(),
        (LogFormat::Json, false) => layer
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .without_time()
            .boxed(),
        (LogFormat::Compact, true) => layer.compact().with_timer(LocalTimestamp).boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
        (LogFormat::Pretty, true) => layer.with_timer(LocalTimestamp).boxed(),
        (LogFormat::Pretty, false) => layer.without_time().boxed(),
    }
}

/// Local wall-clock time, second precision.
#[derive(Debug, Clone, Copy)]
struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        std::fmt::Write::write_fmt(
            w,
            format_args!("{}", chrono::Local::now().format(TIMESTAMP_FORMAT)),
        )
    }
}

fn open_log_file(path: &Path) -> io::Result<SharedFileWriter> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(SharedFileWriter::new(file))
}

#[derive(Clone)]
pub struct SharedFileWriter {
    file: Arc<Mutex<fs::File>>,
}

impl SharedFileWriter {
    fn new(file: fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

pub struct SharedFileGuard {
    file: Arc<Mutex<fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Workspace crates at the configured level, dependencies (HTTP client, TLS)
/// at warn.
fn default_filter_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    format!(
        "warn,odi={level},odi_cli={level},odi_ingest={level},odi_model={level},\
         odi_normalize={level},odi_output={level}"
    )
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let directives = default_filter_directives(config.level_filter);
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    } else {
        EnvFilter::new(directives)
    }
}
