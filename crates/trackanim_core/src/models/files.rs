//! Track files as they move through the pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::TrackClass;
use crate::gpx::GpxDocument;

/// A parsed input file together with its classification.
#[derive(Debug, Clone)]
pub struct ClassifiedFile {
    /// Location of the GPX file on disk.
    pub path: PathBuf,
    /// Classification result.
    pub class: TrackClass,
    /// Document as parsed at classification time.
    pub document: GpxDocument,
}

impl ClassifiedFile {
    pub fn is_track_bearing(&self) -> bool {
        self.class == TrackClass::TrackBearing
    }

    pub fn is_waypoint_only(&self) -> bool {
        self.class == TrackClass::WaypointOnly
    }
}

/// One renderer input: an absolute file path and its assigned color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoredTrack {
    pub path: PathBuf,
    /// Hex color, e.g. `#1b5e20`.
    pub color: String,
}

/// Everything the renderer needs for one video. Built per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Inputs in drawing order.
    pub inputs: Vec<ColoredTrack>,
    /// Absolute path of the video to produce.
    pub destination: PathBuf,
}
