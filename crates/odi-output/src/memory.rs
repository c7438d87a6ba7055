use odi_model::{Encounter, Patient, Test, TrialData};

use crate::error::{Result, SinkError};
use crate::sink::RecordSink;

/// Sink that keeps created records in memory.
///
/// Rejects duplicate tests and patients, and children whose parent was not
/// created first.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    data: TrialData,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &TrialData {
        &self.data
    }

    pub fn into_data(self) -> TrialData {
        self.data
    }
}

impl RecordSink for MemorySink {
    fn create_test(&mut self, test: &Test) -> Result<()> {
        if self.data.tests.contains_key(&test.id) {
            return Err(SinkError::Duplicate {
                entity: "test",
                key: test.id.clone(),
            });
        }
        self.data.tests.insert(test.id.clone(), Test::new(&test.id));
        Ok(())
    }

    fn create_patient(&mut self, test_id: &str, patient: &Patient) -> Result<()> {
        let test = self
            .data
            .tests
            .get_mut(test_id)
            .ok_or_else(|| SinkError::UnknownParent {
                entity: "test",
                key: test_id.to_string(),
            })?;
        if test.patients.contains_key(&patient.nid) {
            return Err(SinkError::Duplicate {
                entity: "patient",
                key: format!("{test_id}/{}", patient.nid),
            });
        }
        let record = Patient::new(&patient.nid, patient.sex, patient.birthdate);
        test.patients.insert(patient.nid.clone(), record);
        Ok(())
    }

    fn create_encounter(&mut self, test_id: &str, nid: &str, encounter: &Encounter) -> Result<()> {
        let patient = self
            .data
            .tests
            .get_mut(test_id)
            .and_then(|test| test.patients.get_mut(nid))
            .ok_or_else(|| SinkError::UnknownParent {
                entity: "patient",
                key: format!("{test_id}/{nid}"),
            })?;
        patient.encounters.push(encounter.clone());
        Ok(())
    }

    fn find_test(&self, test_id: &str) -> Option<&Test> {
        self.data.get(test_id)
    }

    fn find_patient(&self, test_id: &str, nid: &str) -> Option<&Patient> {
        self.data.patient(test_id, nid)
    }
}
