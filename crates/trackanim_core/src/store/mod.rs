//! Registry of uploaded tracks per chat, persisted as JSON.

mod tracks;
mod types;

pub use tracks::TrackStore;
pub use types::{
    AddTrackOutcome, ChatRecord, StoreError, StoreResult, StoredTrack, UploadedDocument,
    ACCEPTED_MIME_TYPES, DEFAULT_FILE_NAME, DEFAULT_USERNAME,
};
