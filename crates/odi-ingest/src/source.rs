use std::future::Future;

use tracing::info;

use crate::document::{Spreadsheet, Worksheet};
use crate::error::Result;

/// A provider of spreadsheet rows.
///
/// `fetch` is one-shot: it returns the whole document, already materialized.
/// Implementations do not retry; failures are returned to the caller as-is.
pub trait RowSource {
    fn fetch(&self, document_id: &str) -> impl Future<Output = Result<Spreadsheet>> + Send;
}

/// Fetch a document and return its first worksheet.
///
/// # Errors
///
/// Propagates fetch errors unchanged and returns
/// [`IngestError::NoWorksheets`](crate::IngestError::NoWorksheets) when the
/// document has no worksheets.
pub async fn fetch_worksheet<S>(source: &S, document_id: &str) -> Result<Worksheet>
where
    S: RowSource,
{
    info!(document_id, "retrieving spreadsheet");
    let spreadsheet = source.fetch(document_id).await?;
    info!(
        title = %spreadsheet.title,
        worksheets = spreadsheet.worksheets.len(),
        "loaded spreadsheet"
    );
    let worksheet = spreadsheet.into_first_worksheet()?;
    info!(worksheet = %worksheet.title, rows = worksheet.rows.len(), "retrieved rows");
    Ok(worksheet)
}
