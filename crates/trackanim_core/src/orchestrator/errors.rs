//! Error types for the animation pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Operation → Detail

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;
use crate::tracks::TrackError;

/// Shown when no file carries a track.
pub const NO_TRACK_FILES_MESSAGE: &str = "Нет файлов, содержащих треки!";

/// Shown when the request has no files at all.
pub const NO_INPUT_FILES_MESSAGE: &str = "Треки не загружены!";

/// Top-level pipeline error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Run '{run_id}' failed at step '{step_name}': {source}")]
    StepFailed {
        run_id: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Failed to set up the run (log directory, work directory).
    #[error("Run '{run_id}' setup failed: {message}")]
    SetupFailed { run_id: String, message: String },
}

impl PipelineError {
    pub fn step_failed(
        run_id: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            run_id: run_id.into(),
            step_name: step_name.into(),
            source,
        }
    }

    pub fn setup_failed(run_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            run_id: run_id.into(),
            message: message.into(),
        }
    }

    /// Message for the person who asked for the video.
    ///
    /// This is the innermost step error, without run or step context.
    pub fn user_message(&self) -> String {
        match self {
            Self::StepFailed { source, .. } => source.to_string(),
            Self::SetupFailed { message, .. } => message.clone(),
        }
    }
}

/// Error from a pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    /// The request carried no files.
    #[error("{}", NO_INPUT_FILES_MESSAGE)]
    NoInputFiles,

    /// No file carries a track.
    #[error("{}", NO_TRACK_FILES_MESSAGE)]
    NoTrackFiles,

    /// A file could not be parsed.
    #[error("Malformed GPX file {}: {message}", path.display())]
    MalformedFile { path: PathBuf, message: String },

    /// More active files than palette colors.
    #[error("Too many tracks: {count} (at most {max})")]
    TooManyTracks { count: usize, max: usize },

    /// The renderer exited without producing the video.
    #[error("{stderr}")]
    RenderFailed { stderr: String },

    /// The renderer could not be started.
    #[error("Failed to start {program}: {message}")]
    SpawnFailed { program: String, message: String },

    /// Settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl StepError {
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedFile {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn render_failed(stderr: impl Into<String>) -> Self {
        Self::RenderFailed {
            stderr: stderr.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

impl From<TrackError> for StepError {
    fn from(err: TrackError) -> Self {
        match err {
            TrackError::NoTrackFiles => Self::NoTrackFiles,
            TrackError::Read { path, source } => Self::malformed(path, source.to_string()),
            TrackError::Write { path, source } => {
                Self::io_error(format!("writing {}", path.display()), source)
            }
            TrackError::InvalidCrop(message) => Self::invalid_config(message),
        }
    }
}

impl From<RenderError> for StepError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::TooManyTracks { count, max } => Self::TooManyTracks { count, max },
            RenderError::Spawn { program, source } => Self::SpawnFailed {
                program,
                message: source.to_string(),
            },
            RenderError::InvalidConfig(message) => Self::invalid_config(message),
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
