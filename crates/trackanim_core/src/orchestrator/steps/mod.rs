//! Pipeline step implementations.
//!
//! Each step prepares the input files for rendering.

mod align_time;
mod classify;
mod merge_waypoints;

pub use align_time::AlignTimeStep;
pub use classify::ClassifyStep;
pub use merge_waypoints::MergeWaypointsStep;
