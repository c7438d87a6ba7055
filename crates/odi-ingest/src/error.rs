//! Error types for row ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching rows.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Structural Errors ===
    /// The document has no worksheets to read rows from.
    #[error("spreadsheet '{title}' must have at least one worksheet")]
    NoWorksheets { title: String },

    // === Remote Errors ===
    /// The document id is unknown to the remote service.
    #[error("spreadsheet not found: {document_id}")]
    NotFound { document_id: String },

    /// The remote service answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}")]
    Http { status: u16, url: String },

    /// The request could not be sent or the response not received.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // === File System Errors ===
    /// CSV file or directory not found.
    #[error("CSV source not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read a file or directory.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === Configuration Errors ===
    /// The source is missing a setting it needs.
    #[error("invalid source configuration: {0}")]
    Config(String),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::NoWorksheets {
            title: "Trial export".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "spreadsheet 'Trial export' must have at least one worksheet"
        );
    }

    #[test]
    fn test_http_error_display() {
        let err = IngestError::Http {
            status: 403,
            url: "https://sheets.googleapis.com/v4/spreadsheets/abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to https://sheets.googleapis.com/v4/spreadsheets/abc failed with HTTP 403"
        );
    }
}
