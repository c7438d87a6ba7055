//! Row source over the Google Sheets v4 REST API.
//!
//! Two requests per fetch: spreadsheet metadata (title and worksheet names),
//! then the cell values of the first worksheet. Other worksheets are listed
//! with no rows since only the first one is ever normalized.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::document::{Spreadsheet, Worksheet};
use crate::error::{IngestError, Result};
use crate::source::RowSource;
use crate::table::rows_from_records;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`SheetsSource`].
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// API key sent with every request. Required.
    pub api_key: Option<String>,
    /// Service root, overridable for proxies and tests.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SheetsSource {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl SheetsSource {
    /// Validate the configuration and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] when the API key is missing or the
    /// base URL cannot carry path segments.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                IngestError::Config("a Google Sheets API key is required".to_string())
            })?;
        let base_url = parse_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| IngestError::Transport {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, mut url: Url, document_id: &str) -> Result<T> {
        // Shown in errors and logs; the key is appended afterwards.
        let shown = url.to_string();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        debug!(url = %shown, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| IngestError::Transport {
                url: shown.clone(),
                source: source.without_url(),
            })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(IngestError::NotFound {
                document_id: document_id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(IngestError::Http {
                status: status.as_u16(),
                url: shown,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| IngestError::Decode {
                url: shown,
                source: source.without_url(),
            })
    }
}

impl RowSource for SheetsSource {
    async fn fetch(&self, document_id: &str) -> Result<Spreadsheet> {
        let mut url = endpoint(&self.base_url, &["v4", "spreadsheets", document_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties.title");
        let metadata: SpreadsheetMetadata = self.get_json(url, document_id).await?;

        let mut worksheets: Vec<Worksheet> = metadata
            .sheets
            .into_iter()
            .map(|sheet| Worksheet {
                title: sheet.properties.title,
                rows: Vec::new(),
            })
            .collect();

        if let Some(first) = worksheets.first_mut() {
            let range = sheet_range(&first.title);
            let mut url = endpoint(
                &self.base_url,
                &["v4", "spreadsheets", document_id, "values", &range],
            )?;
            url.query_pairs_mut()
                .append_pair("majorDimension", "ROWS")
                .append_pair("valueRenderOption", "FORMATTED_VALUE");
            let values: ValueRange = self.get_json(url, document_id).await?;
            first.rows = values.into_rows();
        }

        Ok(Spreadsheet {
            id: document_id.to_string(),
            title: metadata.properties.title,
            worksheets,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|err| IngestError::Config(format!("invalid Sheets base URL '{raw}': {err}")))?;
    if url.cannot_be_a_base() {
        return Err(IngestError::Config(format!(
            "Sheets base URL '{raw}' cannot carry a path"
        )));
    }
    Ok(url)
}

/// Append percent-encoded path segments to the service root.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            IngestError::Config(format!("Sheets base URL '{base}' cannot carry a path"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// A1 range covering a whole worksheet.
fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    properties: TitleProperties,
    #[serde(default)]
    sheets: Vec<SheetMetadata>,
}

#[derive(Debug, Deserialize)]
struct SheetMetadata {
    properties: TitleProperties,
}

#[derive(Debug, Deserialize)]
struct TitleProperties {
    title: String,
}

/// Cell values of a range. Trailing empty cells and rows are omitted by the
/// API, so records can be shorter than the header.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl ValueRange {
    fn into_rows(self) -> Vec<odi_model::Row> {
        let mut records = self.values.into_iter();
        let headers = records.next().unwrap_or_default();
        rows_from_records(&headers, records)
    }
}
