//! Runtime configuration: `.env` loading and row-source selection.

use std::path::PathBuf;

use odi_ingest::{CsvSource, IngestError, RowSource, SheetsConfig, SheetsSource, Spreadsheet};

/// Load a `.env` file from the working directory or its parents.
///
/// A missing file is not an error; the path of a loaded file is returned.
///
/// # Errors
///
/// Returns the `dotenvy` error when a file exists but cannot be parsed.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sheets,
    Csv,
}

/// Settings needed to build a row source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub sheets: SheetsConfig,
}

impl SourceConfig {
    /// Build the configured source.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] for a Sheets source without an API key
    /// or with an unusable base URL.
    pub fn build(&self) -> Result<ConfiguredSource, IngestError> {
        match self.kind {
            SourceKind::Csv => Ok(ConfiguredSource::Csv(CsvSource::new())),
            SourceKind::Sheets => Ok(ConfiguredSource::Sheets(SheetsSource::new(
                self.sheets.clone(),
            )?)),
        }
    }
}

/// One of the row sources, chosen at runtime.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Sheets(SheetsSource),
    Csv(CsvSource),
}

impl RowSource for ConfiguredSource {
    async fn fetch(&self, document_id: &str) -> odi_ingest::Result<Spreadsheet> {
        match self {
            Self::Sheets(source) => source.fetch(document_id).await,
            Self::Csv(source) => source.fetch(document_id).await,
        }
    }
}
