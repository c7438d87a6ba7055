use std::fs;

use odi_cli::config::{SourceConfig, SourceKind};
use odi_cli::pipeline::{TestSummary, run_pipeline};
use odi_ingest::{CsvSource, SheetsConfig};
use odi_model::Sex;
use odi_output::MemorySink;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn csv_rows_reach_the_sink_grouped() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "visits.csv",
        "Test ID,NID,Gender,Date of Birth,ART Start Date Visit\n\
         T1,P1,M,1980-01-01,2020-05-01\n\
         T1,P1,M,1980-01-01,2020-06-01\n\
         T1,P2,F,1990-02-02,\n\
         T2,P1,F,1975-03-03,2021-01-01\n",
    );

    let mut sink = MemorySink::new();
    let result = run_pipeline(&CsvSource::new(), &path, &mut sink)
        .await
        .unwrap();

    assert_eq!(result.worksheet, "visits");
    assert_eq!(result.rows, 4);
    assert_eq!(result.summary.tests, 2);
    assert_eq!(result.summary.patients, 3);
    assert_eq!(result.summary.encounters, 3);
    assert_eq!(
        result.tests,
        vec![
            TestSummary {
                id: "T1".to_string(),
                patients: 2,
                encounters: 2,
            },
            TestSummary {
                id: "T2".to_string(),
                patients: 1,
                encounters: 1,
            },
        ]
    );

    let data = sink.into_data();
    assert_eq!(data.patient("T1", "P1").unwrap().encounters.len(), 2);
    assert_eq!(data.patient("T2", "P1").unwrap().sex, Sex::Female);
    assert!(data.patient("T1", "P2").unwrap().encounters.is_empty());
}

#[tokio::test]
async fn bad_row_leaves_sink_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "visits.csv",
        "testid,nid,gender,dateofbirth,artstartdatevisit\n\
         T1,P1,M,1980-01-01,2020-05-01\n\
         T1,P2,X,1990-02-02,2020-05-01\n",
    );

    let mut sink = MemorySink::new();
    let error = run_pipeline(&CsvSource::new(), &path, &mut sink)
        .await
        .unwrap_err();

    let message = format!("{error:#}");
    assert!(message.contains("failed to normalize"), "{message}");
    assert!(message.contains("'X'"), "{message}");
    assert!(sink.data().is_empty());
}

#[tokio::test]
async fn missing_document_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");

    let mut sink = MemorySink::new();
    let error = run_pipeline(&CsvSource::new(), &path.to_string_lossy(), &mut sink)
        .await
        .unwrap_err();

    assert!(format!("{error:#}").contains("failed to retrieve rows"));
    assert!(sink.data().is_empty());
}

#[tokio::test]
async fn configured_csv_source_runs_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "one.csv",
        "testid,nid,gender,dateofbirth\nT9,P9,F,2001-09-09\n",
    );
    let source = SourceConfig {
        kind: SourceKind::Csv,
        sheets: SheetsConfig::default(),
    }
    .build()
    .unwrap();

    let mut sink = MemorySink::new();
    let result = run_pipeline(&source, &path, &mut sink).await.unwrap();

    assert_eq!(result.summary.patients, 1);
    assert_eq!(result.summary.encounters, 0);
}
