//! Fetch → normalize → upload, as one run.
//!
//! Normalization completes before the sink sees anything, so a row that
//! fails to normalize leaves the sink untouched.

use anyhow::{Context, Result};
use odi_ingest::{RowSource, fetch_worksheet};
use odi_model::{ModelSummary, TrialData};
use odi_output::{RecordSink, upload};
use tracing::{Instrument, info, info_span, trace};

use crate::logging::redact_value;

/// Per-test counts for the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub id: String,
    pub patients: usize,
    pub encounters: usize,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub document_id: String,
    pub worksheet: String,
    pub rows: usize,
    pub summary: ModelSummary,
    pub tests: Vec<TestSummary>,
}

/// Fetch the first worksheet of `document_id` and normalize it.
///
/// Returns the worksheet title, the row count and the model.
pub async fn load_model<S>(source: &S, document_id: &str) -> Result<(String, usize, TrialData)>
where
    S: RowSource,
{
    let worksheet = fetch_worksheet(source, document_id)
        .await
        .with_context(|| format!("failed to retrieve rows from '{document_id}'"))?;
    let data = odi_normalize::normalize(&worksheet.rows).with_context(|| {
        format!("failed to normalize worksheet '{}'", worksheet.title)
    })?;
    log_model(&data);
    Ok((worksheet.title, worksheet.rows.len(), data))
}

/// Run the whole pipeline into `sink`.
pub async fn run_pipeline<S, K>(source: &S, document_id: &str, sink: &mut K) -> Result<PipelineResult>
where
    S: RowSource,
    K: RecordSink + ?Sized,
{
    let (worksheet, rows, data) = load_model(source, document_id)
        .instrument(info_span!("pipeline", document_id))
        .await?;
    let _span = info_span!("upload", document_id).entered();
    let summary = upload(&data, sink).context("failed to upload records")?;
    info!(
        worksheet = %worksheet,
        rows,
        tests = summary.tests,
        patients = summary.patients,
        encounters = summary.encounters,
        "pipeline complete"
    );

    Ok(PipelineResult {
        document_id: document_id.to_string(),
        worksheet,
        rows,
        summary,
        tests: test_summaries(&data),
    })
}

pub fn test_summaries(data: &TrialData) -> Vec<TestSummary> {
    data.tests
        .values()
        .map(|test| TestSummary {
            id: test.id.clone(),
            patients: test.patients.len(),
            encounters: test.encounter_count(),
        })
        .collect()
}

fn log_model(data: &TrialData) {
    for test in data.tests.values() {
        for patient in test.patients.values() {
            let birthdate = patient.birthdate.to_string();
            trace!(
                test_id = %test.id,
                nid = redact_value(&patient.nid),
                sex = patient.sex.as_code(),
                birthdate = redact_value(&birthdate),
                encounters = patient.encounters.len(),
                "patient"
            );
        }
    }
}
