//! Single-pass fold of rows into [`TrialData`].

use std::collections::btree_map::Entry;

use odi_model::columns::{ART_START_DATE_VISIT, DATE_OF_BIRTH, GENDER, NID, TEST_ID};
use odi_model::{Encounter, Patient, Row, Test, TrialData};
use tracing::{debug, info, info_span};

use crate::derive::{parse_date, parse_sex};
use crate::error::{NormalizeError, Result};

/// Normalize a batch of rows into a test → patient → encounter tree.
///
/// Rows are folded in order. A test is created the first time its `testid`
/// appears and a patient the first time its `nid` appears under that test;
/// the patient's sex and birthdate come from that first row and are never
/// overwritten. Each row with a non-empty `artstartdatevisit` appends one
/// encounter to its patient; a whitespace-only value is non-empty and fails
/// to parse.
///
/// # Errors
///
/// Returns the error for the first row that is missing a required column,
/// has a blank `testid`/`nid`, or carries a value that cannot be derived. No
/// partial result is returned.
pub fn normalize(rows: &[Row]) -> Result<TrialData> {
    normalize_iter(rows)
}

/// Same as [`normalize`] for any borrowed row sequence.
pub fn normalize_iter<'a, I>(rows: I) -> Result<TrialData>
where
    I: IntoIterator<Item = &'a Row>,
{
    let span = info_span!("normalize");
    let _guard = span.enter();

    let mut data = TrialData::new();
    let mut row_count = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        fold_row(&mut data, row, index + 1)?;
        row_count += 1;
    }

    let summary = data.summary();
    info!(
        rows = row_count,
        tests = summary.tests,
        patients = summary.patients,
        encounters = summary.encounters,
        "normalized rows"
    );
    Ok(data)
}

fn fold_row(data: &mut TrialData, row: &Row, row_number: usize) -> Result<()> {
    let test_id = require_key(row, TEST_ID, row_number)?;
    let nid = require_key(row, NID, row_number)?;
    // Checked on every row, parsed only when the patient is new.
    let gender = require(row, GENDER, row_number)?;
    let date_of_birth = require(row, DATE_OF_BIRTH, row_number)?;

    let test = match data.tests.entry(test_id.to_string()) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            debug!(row = row_number, test_id, "created test");
            entry.insert(Test::new(test_id))
        }
    };

    let patient = match test.patients.entry(nid.to_string()) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            let sex = parse_sex(gender).map_err(|source| NormalizeError::Derive {
                row: row_number,
                column: GENDER,
                source,
            })?;
            let birthdate = parse_date(date_of_birth).map_err(|source| NormalizeError::Derive {
                row: row_number,
                column: DATE_OF_BIRTH,
                source,
            })?;
            debug!(row = row_number, test_id, "created patient");
            entry.insert(Patient::new(nid, sex, birthdate))
        }
    };

    if let Some(raw) = row.get(ART_START_DATE_VISIT).filter(|value| !value.is_empty()) {
        let start_date = parse_date(raw).map_err(|source| NormalizeError::Derive {
            row: row_number,
            column: ART_START_DATE_VISIT,
            source,
        })?;
        patient.encounters.push(Encounter::new(start_date));
    }
    Ok(())
}

fn require<'a>(row: &'a Row, column: &'static str, row_number: usize) -> Result<&'a str> {
    row.get(column).ok_or(NormalizeError::MissingColumn {
        row: row_number,
        column,
    })
}

fn require_key<'a>(row: &'a Row, column: &'static str, row_number: usize) -> Result<&'a str> {
    let value = require(row, column, row_number)?;
    if value.trim().is_empty() {
        return Err(NormalizeError::EmptyKey {
            row: row_number,
            column,
        });
    }
    Ok(value)
}
