//! Data models shared across pipeline stages.
//!
//! - Enums for file classification and alignment policies
//! - Classified track files as they move through the pipeline

mod enums;
mod files;

pub use enums::{EmptyFilePolicy, ReferencePolicy, RewritePolicy, TrackClass, UntimedFilePolicy};
pub use files::{ClassifiedFile, ColoredTrack, RenderJob};
