//! Error types for track file operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::gpx::GpxError;

/// Errors from classification, merging, alignment and cropping.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Waypoints were supplied but no file carries a track to attach them to.
    #[error("no track-bearing file to attach waypoints to")]
    NoTrackFiles,

    /// A file could not be read or parsed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: GpxError,
    },

    /// A file could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The requested crop range is unusable.
    #[error("invalid crop range: {0}")]
    InvalidCrop(String),
}

impl TrackError {
    pub fn read(path: impl Into<PathBuf>, source: GpxError) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type for track file operations.
pub type TrackResult<T> = Result<T, TrackError>;
