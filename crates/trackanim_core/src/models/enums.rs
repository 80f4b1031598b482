//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Classification of an uploaded GPX file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackClass {
    /// Contains at least one `<trk>` element.
    TrackBearing,
    /// No tracks, but at least one standalone waypoint.
    WaypointOnly,
    /// Neither tracks nor waypoints; ignored by the pipeline.
    Neither,
}

impl std::fmt::Display for TrackClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackClass::TrackBearing => write!(f, "track"),
            TrackClass::WaypointOnly => write!(f, "waypoints"),
            TrackClass::Neither => write!(f, "empty"),
        }
    }
}

/// Which "latest" timestamp segments are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Each file is trimmed relative to its own latest point.
    #[default]
    PerFile,
    /// All files are trimmed relative to the latest point of any file.
    Global,
}

impl std::fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferencePolicy::PerFile => write!(f, "per-file"),
            ReferencePolicy::Global => write!(f, "global"),
        }
    }
}

/// When a trimmed file is written back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewritePolicy {
    /// Rewrite whenever at least one track survives trimming.
    #[default]
    IfTracksRemain,
    /// Rewrite only when some segment was actually removed.
    WhenFiltered,
}

/// What happens to a file whose tracks were all trimmed away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyFilePolicy {
    /// Keep the original file in the active set.
    #[default]
    Keep,
    /// Remove it from the active set.
    Drop,
}

/// What happens to a track file with no timestamped points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UntimedFilePolicy {
    /// Skip trimming; the file is still rendered.
    #[default]
    Render,
    /// Remove it from the active set.
    Drop,
}
