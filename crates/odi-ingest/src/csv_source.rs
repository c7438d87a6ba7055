//! Row source over local CSV exports.

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::debug;

use crate::document::{Spreadsheet, Worksheet};
use crate::error::{IngestError, Result};
use crate::source::RowSource;
use crate::table::rows_from_records;

/// Reads a spreadsheet exported as CSV.
///
/// The document id is a path. A `.csv` file is a single worksheet named after
/// its file stem; a directory is a spreadsheet with one worksheet per `.csv`
/// file, ordered by file name. Files are read synchronously: exports are
/// bounded and are read once before normalization starts.
#[derive(Debug, Clone, Default)]
pub struct CsvSource;

impl CsvSource {
    pub fn new() -> Self {
        Self
    }

    /// Load a document without going through the async trait.
    pub fn load(&self, document_id: &str) -> Result<Spreadsheet> {
        let path = Path::new(document_id);
        if !path.exists() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let files = if path.is_dir() {
            list_csv_files(path)?
        } else {
            vec![path.to_path_buf()]
        };
        let worksheets = files
            .iter()
            .map(|file| read_worksheet(file))
            .collect::<Result<Vec<_>>>()?;
        Ok(Spreadsheet {
            id: document_id.to_string(),
            title: file_stem(path),
            worksheets,
        })
    }
}

impl RowSource for CsvSource {
    async fn fetch(&self, document_id: &str) -> Result<Spreadsheet> {
        self.load(document_id)
    }
}

/// List `.csv` files in a directory, sorted by name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::FileRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read one CSV file as a worksheet. The first record is the header.
pub fn read_worksheet(path: &Path) -> Result<Worksheet> {
    let csv_error = |err: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record.map_err(csv_error)?.iter().map(str::to_string).collect(),
        None => Vec::new(),
    };
    let mut raw_rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_error)?;
        raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    let rows = rows_from_records(&headers, raw_rows);
    debug!(path = %path.display(), rows = rows.len(), "read csv worksheet");
    Ok(Worksheet {
        title: file_stem(path),
        rows,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
