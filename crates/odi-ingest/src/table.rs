//! Header normalization and row assembly shared by all sources.

use odi_model::Row;
use tracing::warn;

/// Normalize a raw header the way the sheet list feed keys its columns:
/// lowercase ASCII letters and digits only.
///
/// `"ART Start Date (Visit)"` becomes `"artstartdatevisit"`.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Resolve header positions to normalized column names.
///
/// Headers that normalize to nothing are dropped; for duplicates the first
/// column wins.
fn column_positions(headers: &[String]) -> Vec<(usize, String)> {
    let mut columns: Vec<(usize, String)> = Vec::with_capacity(headers.len());
    for (index, raw) in headers.iter().enumerate() {
        let name = normalize_header(raw);
        if name.is_empty() {
            continue;
        }
        if columns.iter().any(|(_, existing)| *existing == name) {
            warn!(column = %name, position = index + 1, "duplicate column ignored");
            continue;
        }
        columns.push((index, name));
    }
    columns
}

/// Build rows from a raw header record and the data records after it.
///
/// Short records are padded with empty cells, cells past the last header are
/// ignored, and records whose cells are all empty are skipped.
pub fn rows_from_records<I>(headers: &[String], records: I) -> Vec<Row>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let columns = column_positions(headers);
    records
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .map(|(index, name)| {
                    let value = record
                        .get(*index)
                        .map(|cell| normalize_cell(cell))
                        .unwrap_or_default();
                    (name.clone(), value)
                })
                .collect::<Row>()
        })
        .filter(|row| !row.is_blank())
        .collect()
}
