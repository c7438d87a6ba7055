//! JSON export of created records.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use odi_model::{Encounter, Patient, Test, TrialData};
use tracing::info;

use crate::error::{Result, SinkError};
use crate::memory::MemorySink;
use crate::sink::RecordSink;

/// Where a [`JsonSink`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonTarget {
    Stdout,
    File(PathBuf),
}

/// Collects records like [`MemorySink`] and writes them as one pretty JSON
/// document, keyed by test id, when finished.
#[derive(Debug)]
pub struct JsonSink {
    records: MemorySink,
    target: JsonTarget,
}

impl JsonSink {
    pub fn new(target: JsonTarget) -> Self {
        Self {
            records: MemorySink::new(),
            target,
        }
    }

    pub fn data(&self) -> &TrialData {
        self.records.data()
    }
}

/// Serialize `data` as pretty JSON followed by a newline.
pub fn write_json<W: Write>(data: &TrialData, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    Ok(())
}

impl RecordSink for JsonSink {
    fn create_test(&mut self, test: &Test) -> Result<()> {
        self.records.create_test(test)
    }

    fn create_patient(&mut self, test_id: &str, patient: &Patient) -> Result<()> {
        self.records.create_patient(test_id, patient)
    }

    fn create_encounter(&mut self, test_id: &str, nid: &str, encounter: &Encounter) -> Result<()> {
        self.records.create_encounter(test_id, nid, encounter)
    }

    fn find_test(&self, test_id: &str) -> Option<&Test> {
        self.records.find_test(test_id)
    }

    fn find_patient(&self, test_id: &str, nid: &str) -> Option<&Patient> {
        self.records.find_patient(test_id, nid)
    }

    fn finish(&mut self) -> Result<()> {
        match &self.target {
            JsonTarget::Stdout => {
                let stdout = io::stdout();
                let mut writer = BufWriter::new(stdout.lock());
                write_json(self.records.data(), &mut writer)?;
                writer.flush().map_err(|source| SinkError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            }
            JsonTarget::File(path) => {
                let io_error = |source| SinkError::Io {
                    path: path.clone(),
                    source,
                };
                let file = File::create(path).map_err(io_error)?;
                let mut writer = BufWriter::new(file);
                write_json(self.records.data(), &mut writer)?;
                writer.flush().map_err(io_error)?;
                info!(path = %path.display(), "wrote JSON export");
            }
        }
        Ok(())
    }
}
