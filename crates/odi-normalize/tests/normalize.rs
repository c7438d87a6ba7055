//! Behavioural tests for the row normalizer.

use chrono::NaiveDate;
use odi_model::{Row, Sex};
use odi_normalize::{DeriveError, NormalizeError, normalize};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn row(test_id: &str, nid: &str, gender: &str, dob: &str, art_start: &str) -> Row {
    Row::from_pairs([
        ("testid", test_id),
        ("nid", nid),
        ("gender", gender),
        ("dateofbirth", dob),
        ("artstartdatevisit", art_start),
    ])
}

#[test]
fn end_to_end_example() {
    let rows = vec![
        row("T1", "N1", "F", "1990-01-01", "2020-05-01"),
        row("T1", "N1", "M", "1985-01-01", ""),
        row("T1", "N2", "M", "2000-03-03", "2021-06-01"),
    ];
    let data = normalize(&rows).expect("normalize");

    assert_eq!(data.len(), 1);
    let test = data.get("T1").expect("T1");
    assert_eq!(test.id, "T1");
    assert_eq!(test.patients.len(), 2);

    let n1 = &test.patients["N1"];
    assert_eq!(n1.sex, Sex::Female);
    assert_eq!(n1.birthdate, date(1990, 1, 1));
    assert_eq!(n1.encounters.len(), 1);
    assert_eq!(n1.encounters[0].start_date, date(2020, 5, 1));
    assert_eq!(n1.encounters[0].encounter_type, "");
    assert_eq!(n1.encounters[0].location, "");

    let n2 = &test.patients["N2"];
    assert_eq!(n2.sex, Sex::Male);
    assert_eq!(n2.birthdate, date(2000, 3, 3));
    assert_eq!(n2.encounters.len(), 1);
    assert_eq!(n2.encounters[0].start_date, date(2021, 6, 1));
    assert_eq!(n2.location, "");
}

#[test]
fn rows_with_same_test_id_share_one_test() {
    let rows = vec![
        row("T1", "N1", "F", "1990-01-01", ""),
        row("T2", "N2", "M", "1991-01-01", ""),
        row("T1", "N3", "M", "1992-01-01", ""),
        row("T1", "N4", "F", "1993-01-01", ""),
    ];
    let data = normalize(&rows).expect("normalize");
    assert_eq!(data.len(), 2);
    assert_eq!(data.get("T1").expect("T1").patients.len(), 3);
    assert_eq!(data.get("T2").expect("T2").patients.len(), 1);
}

#[test]
fn same_nid_under_different_tests_is_two_patients() {
    let rows = vec![
        row("T1", "P1", "F", "1990-01-01", "2020-01-01"),
        row("T2", "P1", "M", "1970-07-07", ""),
    ];
    let data = normalize(&rows).expect("normalize");

    let first = data.patient("T1", "P1").expect("T1/P1");
    let second = data.patient("T2", "P1").expect("T2/P1");
    assert_eq!(first.sex, Sex::Female);
    assert_eq!(second.sex, Sex::Male);
    assert_eq!(first.encounters.len(), 1);
    assert!(second.encounters.is_empty());
    assert_eq!(data.summary().patients, 2);
}

#[test]
fn first_row_wins_for_patient_fields() {
    let rows = vec![
        row("T1", "N1", "m", "1980-12-31", ""),
        row("T1", "N1", "F", "1999-09-09", ""),
    ];
    let data = normalize(&rows).expect("normalize");
    let patient = data.patient("T1", "N1").expect("patient");
    assert_eq!(patient.sex, Sex::Male);
    assert_eq!(patient.birthdate, date(1980, 12, 31));
}

#[test]
fn later_malformed_identity_fields_are_ignored() {
    let rows = vec![
        row("T1", "N1", "F", "1990-01-01", ""),
        row("T1", "N1", "X", "someday", "2020-01-01"),
    ];
    let data = normalize(&rows).expect("normalize");
    let patient = data.patient("T1", "N1").expect("patient");
    assert_eq!(patient.sex, Sex::Female);
    assert_eq!(patient.encounters.len(), 1);
}

#[test]
fn encounters_accumulate_in_row_order_with_duplicates() {
    let rows = vec![
        row("T1", "N1", "F", "1990-01-01", "2020-05-01"),
        row("T1", "N1", "F", "1990-01-01", "2020-05-01"),
        row("T1", "N1", "F", "1990-01-01", "2019-01-15"),
    ];
    let data = normalize(&rows).expect("normalize");
    let starts: Vec<NaiveDate> = data
        .patient("T1", "N1")
        .expect("patient")
        .encounters
        .iter()
        .map(|encounter| encounter.start_date)
        .collect();
    assert_eq!(
        starts,
        vec![date(2020, 5, 1), date(2020, 5, 1), date(2019, 1, 15)]
    );
}

#[test]
fn empty_or_absent_start_date_adds_no_encounter() {
    let without_column = Row::from_pairs([
        ("testid", "T1"),
        ("nid", "N2"),
        ("gender", "M"),
        ("dateofbirth", "1990-01-01"),
    ]);
    let rows = vec![row("T1", "N1", "F", "1990-01-01", ""), without_column];
    let data = normalize(&rows).expect("normalize");
    assert_eq!(data.summary().encounters, 0);
    assert_eq!(data.summary().patients, 2);
}

#[test]
fn unknown_gender_aborts_normalization() {
    let rows = vec![
        row("T1", "N1", "F", "1990-01-01", ""),
        row("T1", "N2", "X", "1990-01-01", ""),
    ];
    let err = normalize(&rows).expect_err("gender X must fail");
    assert_eq!(
        err,
        NormalizeError::Derive {
            row: 2,
            column: "gender",
            source: DeriveError::InvalidSex {
                value: "X".to_string()
            },
        }
    );
}

#[test]
fn bad_birthdate_aborts_normalization() {
    let rows = vec![row("T1", "N1", "F", "31/12/1990", "")];
    let err = normalize(&rows).expect_err("ambiguous date must fail");
    assert!(matches!(
        err,
        NormalizeError::Derive {
            row: 1,
            column: "dateofbirth",
            source: DeriveError::InvalidDate { .. },
        }
    ));
}

#[test]
fn bad_start_date_aborts_normalization() {
    let rows = vec![row("T1", "N1", "F", "1990-01-01", "soon")];
    let err = normalize(&rows).expect_err("start date must fail");
    assert!(matches!(
        err,
        NormalizeError::Derive {
            column: "artstartdatevisit",
            ..
        }
    ));
}

#[test]
fn missing_required_column_fails_fast() {
    let rows = vec![
        row("T1", "N1", "F", "1990-01-01", ""),
        Row::from_pairs([("testid", "T1"), ("nid", "N1"), ("gender", "F")]),
    ];
    let err = normalize(&rows).expect_err("missing dateofbirth");
    assert_eq!(
        err,
        NormalizeError::MissingColumn {
            row: 2,
            column: "dateofbirth",
        }
    );
}

#[test]
fn blank_key_fails_fast() {
    let rows = vec![row("T1", "  ", "F", "1990-01-01", "")];
    let err = normalize(&rows).expect_err("blank nid");
    assert_eq!(err, NormalizeError::EmptyKey { row: 1, column: "nid" });
}

#[test]
fn padded_sex_code_is_rejected() {
    let rows = vec![row("T1", "N1", " f ", "1990-01-01", "")];
    let err = normalize(&rows).expect_err("padded code");
    assert_eq!(
        err,
        NormalizeError::Derive {
            row: 1,
            column: "gender",
            source: DeriveError::InvalidSex {
                value: " f ".to_string()
            },
        }
    );
}

#[test]
fn whitespace_start_date_is_parsed_not_skipped() {
    let rows = vec![
        row("T1", "N1", "F", "1990-01-01", "2020-05-01"),
        row("T1", "N1", "F", "1990-01-01", "   "),
    ];
    let err = normalize(&rows).expect_err("blank date");
    assert_eq!(
        err,
        NormalizeError::Derive {
            row: 2,
            column: "artstartdatevisit",
            source: DeriveError::InvalidDate {
                value: "   ".to_string()
            },
        }
    );
}

#[test]
fn empty_input_yields_empty_model() {
    let data = normalize(&[]).expect("normalize");
    assert!(data.is_empty());
}
