//! Core types for the animation pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::ClassifiedFile;
use crate::tracks::{AlignmentReport, MergeReport};

/// Read-only context passed to pipeline steps.
///
/// Mutable state goes in `AnimationState`.
pub struct Context {
    /// Application settings.
    pub settings: Settings,
    /// Run identifier, also the log file stem.
    pub run_id: String,
    /// Directory receiving rendered videos.
    pub work_dir: PathBuf,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
}

impl Context {
    pub fn new(
        settings: Settings,
        run_id: impl Into<String>,
        work_dir: PathBuf,
        logger: Arc<RunLogger>,
    ) -> Self {
        Self {
            settings,
            run_id: run_id.into(),
            work_dir,
            logger,
        }
    }
}

/// State accumulated by the steps of one run.
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
    /// Files as requested, in order.
    pub inputs: Vec<PathBuf>,
    /// Classification results, in input order.
    pub classified: Vec<ClassifiedFile>,
    /// Files that will be rendered, in order.
    pub active: Vec<PathBuf>,
    pub merge: Option<MergeReport>,
    pub alignment: Option<AlignmentReport>,
}

impl AnimationState {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    pub fn has_classification(&self) -> bool {
        !self.classified.is_empty()
    }
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (nothing to do, not an error).
    Skipped(String),
}

/// Final result of an animation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum AnimationOutcome {
    /// Absolute path of the rendered video.
    Success(PathBuf),
    /// Message suitable for showing to the requester.
    Error(String),
}

impl AnimationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn video_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Success(path) => Some(path),
            Self::Error(_) => None,
        }
    }
}
