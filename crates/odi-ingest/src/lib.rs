//! Row ingestion for trial spreadsheets.
//!
//! A [`RowSource`] fetches a whole spreadsheet document in one call and
//! returns it fully materialized. Headers are normalized the way the sheet
//! list feed exposes them (lowercase alphanumerics), so `Test ID` becomes
//! `testid` regardless of where the rows came from.

pub mod csv_source;
pub mod document;
pub mod error;
pub mod sheets;
pub mod source;
pub mod table;

pub use csv_source::CsvSource;
pub use document::{Spreadsheet, Worksheet};
pub use error::{IngestError, Result};
pub use sheets::{DEFAULT_SHEETS_BASE_URL, SheetsConfig, SheetsSource};
pub use source::{RowSource, fetch_worksheet};
pub use table::{normalize_header, rows_from_records};
