//! Hierarchical trial data: test → patient → encounter.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Sex;

/// A dated clinical event recorded for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    /// Encounter type. Not mapped from the sheet yet; always empty.
    #[serde(rename = "type")]
    pub encounter_type: String,
    pub start_date: NaiveDate,
    /// Not mapped from the sheet yet; always empty.
    pub location: String,
}

impl Encounter {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            encounter_type: String::new(),
            start_date,
            location: String::new(),
        }
    }
}

/// A patient enrolled in one test.
///
/// `nid`, `sex` and `birthdate` are fixed by the first row that introduces
/// the patient; encounters accumulate in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub nid: String,
    /// Not mapped from the sheet yet; always empty.
    pub location: String,
    pub sex: Sex,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
}

impl Patient {
    pub fn new(nid: impl Into<String>, sex: Sex, birthdate: NaiveDate) -> Self {
        Self {
            nid: nid.into(),
            location: String::new(),
            sex,
            birthdate,
            encounters: Vec::new(),
        }
    }
}

/// A trial/test and the patients recorded under it, keyed by nid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub id: String,
    #[serde(default)]
    pub patients: BTreeMap<String, Patient>,
}

impl Test {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            patients: BTreeMap::new(),
        }
    }

    pub fn encounter_count(&self) -> usize {
        self.patients
            .values()
            .map(|patient| patient.encounters.len())
            .sum()
    }
}

/// The normalized result: every test keyed by its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialData {
    pub tests: BTreeMap<String, Test>,
}

impl TrialData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, test_id: &str) -> Option<&Test> {
        self.tests.get(test_id)
    }

    /// Looks up a patient by its `(test id, nid)` key.
    pub fn patient(&self, test_id: &str, nid: &str) -> Option<&Patient> {
        self.tests.get(test_id)?.patients.get(nid)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            tests: self.tests.len(),
            patients: self.tests.values().map(|test| test.patients.len()).sum(),
            encounters: self.tests.values().map(Test::encounter_count).sum(),
        }
    }
}

/// Entity counts for a [`TrialData`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub tests: usize,
    pub patients: usize,
    pub encounters: usize,
}
