//! Error types for content loading and progress storage.
//!
//! Neither kind ever reaches the UI as a failure: catalog errors only occur
//! for malformed content tables, and storage errors are absorbed by the
//! progress store, which falls back to defaults.

use thiserror::Error;

/// Content table could not be turned into a valid catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("content parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate chapter id `{0}`")]
    DuplicateId(String),

    #[error("chapters `{first}` and `{second}` share order {order}")]
    DuplicateOrder {
        order: u32,
        first: String,
        second: String,
    },

    #[error("chapter `{id}` has invalid color `{color}`")]
    InvalidColor { id: String, color: String },

    #[error("chapter `{chapter}` repeats subtopic id `{subtopic}`")]
    DuplicateSubtopic { chapter: String, subtopic: String },
}

/// Failure inside a progress storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress blob is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("progress blob is not a JSON object")]
    NotAnObject,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
