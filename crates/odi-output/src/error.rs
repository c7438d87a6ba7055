use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing records to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// An entity with the same key was already created.
    #[error("{entity} '{key}' already exists")]
    Duplicate { entity: &'static str, key: String },

    /// A child entity refers to a parent that was never created.
    #[error("{entity} '{key}' does not exist")]
    UnknownParent { entity: &'static str, key: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SinkError>;
