//! Records kept by the track store.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME types accepted as GPX uploads.
pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["application/gpx+xml", "application/octet-stream"];

/// Name used when an upload has none.
pub const DEFAULT_FILE_NAME: &str = "unnamed.gpx";

/// Username stored when a chat has none.
pub const DEFAULT_USERNAME: &str = "-";

/// A file as announced by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    /// Transport handle used to download the file.
    pub file_id: String,
    /// Stable identifier, also used as the cached file stem.
    pub file_unique_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// A track registered for a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTrack {
    pub id: u64,
    pub chat_id: i64,
    pub file_name: String,
    pub document_id: String,
    pub unique_id: String,
}

/// A chat known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: i64,
    pub username: String,
}

/// Result of trying to register an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTrackOutcome {
    /// The message carried no document.
    NoDocument,
    /// The document is not GPX; carries its MIME type or `"Unknown"`.
    NotGpx(String),
    /// The chat already has the maximum number of tracks.
    TooMany(usize),
    Added(StoredTrack),
}

/// Errors from persisting the store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access track store: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode track store: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
