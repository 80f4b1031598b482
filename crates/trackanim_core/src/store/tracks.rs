//! Per-chat track registry with JSON persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::MAX_TRACKS;

use super::types::{
    AddTrackOutcome, ChatRecord, StoreResult, StoredTrack, UploadedDocument,
    ACCEPTED_MIME_TYPES, DEFAULT_FILE_NAME, DEFAULT_USERNAME,
};

/// On-disk layout of `tracks.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreState {
    version: u32,
    next_id: u64,
    chats: Vec<ChatRecord>,
    tracks: Vec<StoredTrack>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            version: 1,
            next_id: 1,
            chats: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

/// Tracks uploaded per chat, saved after every change.
#[derive(Debug)]
pub struct TrackStore {
    state: StoreState,
    store_file: PathBuf,
}

impl TrackStore {
    /// Open the store at `path`, starting empty if it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store_file = path.into();

        let state = if store_file.exists() {
            match fs::read_to_string(&store_file) {
                Ok(content) => match serde_json::from_str::<StoreState>(&content) {
                    Ok(state) => {
                        tracing::info!(
                            "Loaded {} track(s) for {} chat(s) from {}",
                            state.tracks.len(),
                            state.chats.len(),
                            store_file.display()
                        );
                        state
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", store_file.display(), e);
                        StoreState::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", store_file.display(), e);
                    StoreState::default()
                }
            }
        } else {
            StoreState::default()
        };

        Self { state, store_file }
    }

    /// Create a store without persistence (for testing).
    pub fn in_memory() -> Self {
        Self {
            state: StoreState::default(),
            store_file: PathBuf::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.store_file
    }

    /// Persist the store to disk.
    pub fn save(&self) -> StoreResult<()> {
        if self.store_file.as_os_str().is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.store_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.state)?;
        let temp_file = self.store_file.with_extension("json.tmp");
        fs::write(&temp_file, &json)?;
        fs::rename(&temp_file, &self.store_file)?;

        tracing::debug!("Saved {} track(s)", self.state.tracks.len());
        Ok(())
    }

    /// Register an upload for `chat_id`.
    ///
    /// The chat's username is recorded even when the upload is rejected.
    pub fn try_add_track(
        &mut self,
        chat_id: i64,
        username: Option<&str>,
        document: Option<&UploadedDocument>,
    ) -> StoreResult<AddTrackOutcome> {
        self.upsert_chat(chat_id, username.unwrap_or(DEFAULT_USERNAME));

        let outcome = match document {
            None => AddTrackOutcome::NoDocument,
            Some(doc) if !is_gpx_mime(doc.mime_type.as_deref()) => AddTrackOutcome::NotGpx(
                doc.mime_type.clone().unwrap_or_else(|| "Unknown".to_string()),
            ),
            Some(doc) => {
                let count = self.count_tracks(chat_id);
                if count >= MAX_TRACKS {
                    AddTrackOutcome::TooMany(count)
                } else {
                    let track = StoredTrack {
                        id: self.state.next_id,
                        chat_id,
                        file_name: doc
                            .file_name
                            .clone()
                            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
                        document_id: doc.file_id.clone(),
                        unique_id: doc.file_unique_id.clone(),
                    };
                    self.state.next_id += 1;
                    self.state.tracks.push(track.clone());
                    tracing::info!("Chat {} added track {}", chat_id, track.file_name);
                    AddTrackOutcome::Added(track)
                }
            }
        };

        self.save()?;
        Ok(outcome)
    }

    /// Tracks registered for a chat, in upload order.
    pub fn list_tracks(&self, chat_id: i64) -> Vec<&StoredTrack> {
        self.state
            .tracks
            .iter()
            .filter(|t| t.chat_id == chat_id)
            .collect()
    }

    pub fn get_track(&self, id: u64) -> Option<&StoredTrack> {
        self.state.tracks.iter().find(|t| t.id == id)
    }

    pub fn count_tracks(&self, chat_id: i64) -> usize {
        self.state
            .tracks
            .iter()
            .filter(|t| t.chat_id == chat_id)
            .count()
    }

    /// Forget all tracks of a chat. Returns how many were removed.
    pub fn clear_tracks(&mut self, chat_id: i64) -> StoreResult<usize> {
        let before = self.state.tracks.len();
        self.state.tracks.retain(|t| t.chat_id != chat_id);
        let removed = before - self.state.tracks.len();
        self.save()?;
        Ok(removed)
    }

    pub fn chat(&self, chat_id: i64) -> Option<&ChatRecord> {
        self.state.chats.iter().find(|c| c.id == chat_id)
    }

    fn upsert_chat(&mut self, chat_id: i64, username: &str) {
        match self.state.chats.iter_mut().find(|c| c.id == chat_id) {
            Some(chat) => chat.username = username.to_string(),
            None => self.state.chats.push(ChatRecord {
                id: chat_id,
                username: username.to_string(),
            }),
        }
    }
}

fn is_gpx_mime(mime: Option<&str>) -> bool {
    mime.is_some_and(|m| ACCEPTED_MIME_TYPES.contains(&m))
}
