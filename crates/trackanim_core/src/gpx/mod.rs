//! GPX document model, parsing and serialization.
//!
//! Track files are read into a [`GpxDocument`], transformed in memory by the
//! pipeline stages, and written back with [`write_gpx_file`], which replaces
//! the file atomically.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use trackanim_core::gpx::{parse_gpx_file, write_gpx_file};
//!
//! let path = Path::new("files/ride.gpx");
//! let mut doc = parse_gpx_file(path).unwrap();
//! doc.waypoints.clear();
//! write_gpx_file(path, &doc).unwrap();
//! ```

mod parser;
mod types;
mod writer;

pub use parser::{parse_gpx_file, parse_gpx_str, parse_gpx_time};
pub use types::{
    GpxDocument, GpxError, GpxMetadata, GpxPoint, GpxResult, RawElement, Route, Segment, Track,
};
pub use writer::{format_gpx_time, serialize_gpx, write_gpx_file};
