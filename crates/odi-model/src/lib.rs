pub mod columns;
pub mod enums;
pub mod error;
pub mod row;
pub mod trial;

pub use enums::Sex;
pub use error::{ModelError, Result};
pub use row::Row;
pub use trial::{Encounter, ModelSummary, Patient, Test, TrialData};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_counts_all_levels() {
        let mut data = TrialData::new();
        let mut test = Test::new("T1");
        let mut patient = Patient::new("N1", Sex::Female, date(1990, 1, 1));
        patient.encounters.push(Encounter::new(date(2020, 5, 1)));
        patient.encounters.push(Encounter::new(date(2020, 6, 1)));
        test.patients.insert(patient.nid.clone(), patient);
        test.patients.insert(
            "N2".to_string(),
            Patient::new("N2", Sex::Male, date(2000, 3, 3)),
        );
        data.tests.insert(test.id.clone(), test);
        data.tests.insert("T2".to_string(), Test::new("T2"));

        let summary = data.summary();
        assert_eq!(summary.tests, 2);
        assert_eq!(summary.patients, 2);
        assert_eq!(summary.encounters, 2);
    }

    #[test]
    fn empty_model_has_zero_summary() {
        let summary = TrialData::new().summary();
        assert_eq!(summary, ModelSummary::default());
    }
}
