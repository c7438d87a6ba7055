//! Record sinks for normalized trial data.
//!
//! A [`RecordSink`] receives entities one at a time, parents before
//! children, through [`upload`]. Upload only ever runs on a completely
//! normalized [`TrialData`](odi_model::TrialData), so a failed run never
//! reaches a sink.

pub mod error;
pub mod json;
pub mod memory;
pub mod sink;

pub use error::{Result, SinkError};
pub use json::{JsonSink, JsonTarget, write_json};
pub use memory::MemorySink;
pub use sink::{RecordSink, upload};
