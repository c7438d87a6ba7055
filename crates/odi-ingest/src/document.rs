use odi_model::Row;
use serde::Serialize;

use crate::error::{IngestError, Result};

/// One tab of a spreadsheet, rows keyed by normalized header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Worksheet {
    pub title: String,
    pub rows: Vec<Row>,
}

/// A fetched spreadsheet document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Spreadsheet {
    pub id: String,
    pub title: String,
    pub worksheets: Vec<Worksheet>,
}

impl Spreadsheet {
    /// Take the worksheet rows are normalized from.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::NoWorksheets`] when the document is empty.
    pub fn into_first_worksheet(self) -> Result<Worksheet> {
        let title = self.title;
        self.worksheets
            .into_iter()
            .next()
            .ok_or(IngestError::NoWorksheets { title })
    }
}
