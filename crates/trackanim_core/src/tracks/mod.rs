//! Operations over GPX track files: classification, waypoint merging,
//! temporal alignment and cropping.
//!
//! All functions here are synchronous and work directly on files; the
//! orchestrator wraps them into pipeline steps.

mod align;
mod classify;
mod crop;
mod merge;
mod types;

pub use align::{
    align_files, trim_document, AlignmentPolicy, AlignmentReport, FileAlignment, TrimmedDocument,
};
pub use classify::{classify, classify_file};
pub use crop::{crop_by_index, crop_file};
pub use merge::{merge_waypoints, MergeReport};
pub use types::{TrackError, TrackResult};
