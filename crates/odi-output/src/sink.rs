use odi_model::{Encounter, ModelSummary, Patient, Test, TrialData};
use tracing::{debug, info};

use crate::error::Result;

/// Create/query operations per entity type.
///
/// Creation is parent-first: a test before its patients, a patient before
/// its encounters. `create_test` and `create_patient` only carry the entity's
/// own fields; children arrive through their own calls.
pub trait RecordSink {
    fn create_test(&mut self, test: &Test) -> Result<()>;

    fn create_patient(&mut self, test_id: &str, patient: &Patient) -> Result<()>;

    fn create_encounter(&mut self, test_id: &str, nid: &str, encounter: &Encounter) -> Result<()>;

    fn find_test(&self, test_id: &str) -> Option<&Test>;

    fn find_patient(&self, test_id: &str, nid: &str) -> Option<&Patient>;

    /// Called once after every entity was created.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Walk `data` test → patient → encounter in model order and create every
/// entity in `sink`.
///
/// # Errors
///
/// Stops at the first sink error. Entities created before it stay created.
pub fn upload<S>(data: &TrialData, sink: &mut S) -> Result<ModelSummary>
where
    S: RecordSink + ?Sized,
{
    for test in data.tests.values() {
        sink.create_test(test)?;
        for patient in test.patients.values() {
            sink.create_patient(&test.id, patient)?;
            for encounter in &patient.encounters {
                sink.create_encounter(&test.id, &patient.nid, encounter)?;
            }
        }
        debug!(test_id = %test.id, patients = test.patients.len(), "uploaded test");
    }
    sink.finish()?;

    let summary = data.summary();
    info!(
        tests = summary.tests,
        patients = summary.patients,
        encounters = summary.encounters,
        "uploaded records"
    );
    Ok(summary)
}
