//! Local cache of uploaded GPX documents.
//!
//! Files are stored as `<base>/<unique_id>.gpx` and downloaded at most once
//! through a [`DocumentFetcher`] supplied by the chat transport.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Downloads a document from wherever the transport keeps it.
pub trait DocumentFetcher: Send + Sync {
    /// Write document `document_id` to `destination`.
    fn fetch(
        &self,
        document_id: &str,
        destination: &Path,
    ) -> impl Future<Output = io::Result<()>> + Send;
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to download document {document_id}: {source}")]
    Fetch {
        document_id: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid document id: {0:?}")]
    InvalidId(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Directory of downloaded documents keyed by their unique id.
#[derive(Debug, Clone)]
pub struct FileCache {
    base: PathBuf,
}

impl FileCache {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Where the document with `unique_id` lives (or will live).
    pub fn file_path(&self, unique_id: &str) -> CacheResult<PathBuf> {
        if unique_id.is_empty()
            || unique_id.contains(['/', '\\'])
            || unique_id == "."
            || unique_id == ".."
        {
            return Err(CacheError::InvalidId(unique_id.to_string()));
        }
        Ok(self.base.join(format!("{}.gpx", unique_id)))
    }

    /// Return the cached file, downloading it first if absent.
    pub async fn load_file<F: DocumentFetcher>(
        &self,
        fetcher: &F,
        document_id: &str,
        unique_id: &str,
    ) -> CacheResult<PathBuf> {
        let destination = self.file_path(unique_id)?;
        tokio::fs::create_dir_all(&self.base)
            .await
            .map_err(|source| CacheError::Io {
                operation: format!("creating {}", self.base.display()),
                source,
            })?;

        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            return Ok(destination);
        }

        tracing::debug!("Downloading {} to {}", document_id, destination.display());
        fetcher
            .fetch(document_id, &destination)
            .await
            .map_err(|source| CacheError::Fetch {
                document_id: document_id.to_string(),
                source,
            })?;
        Ok(destination)
    }

    /// Discard any local copy and download the document again.
    pub async fn reset<F: DocumentFetcher>(
        &self,
        fetcher: &F,
        document_id: &str,
        unique_id: &str,
    ) -> CacheResult<PathBuf> {
        let path = self.file_path(unique_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Removed cached {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(CacheError::Io {
                    operation: format!("removing {}", path.display()),
                    source,
                })
            }
        }
        self.load_file(fetcher, document_id, unique_id).await
    }
}
