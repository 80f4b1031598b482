//! Renderer errors and invocation output.

use std::io;

use thiserror::Error;

/// Errors raised before or while invoking the renderer.
///
/// A renderer that runs but produces no video is not an error at this
/// level; the dispatcher decides that from the destination file.
#[derive(Error, Debug)]
pub enum RenderError {
    /// More tracks than palette colors.
    #[error("Too many tracks: {count} (at most {max})")]
    TooManyTracks { count: usize, max: usize },

    /// The renderer process could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The renderer is misconfigured.
    #[error("Invalid renderer configuration: {0}")]
    InvalidConfig(String),
}

impl RenderError {
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Captured result of one renderer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    /// Exit code, `None` if terminated by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RenderOutput {
    /// stderr decoded lossily as UTF-8.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}
