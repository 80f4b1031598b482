//! Builders for GPX fixtures used across unit tests.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::gpx::{write_gpx_file, GpxDocument, GpxPoint, Segment, Track};

/// Fixed reference instant: 2024-05-10 18:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap()
}

/// `base_time()` minus the given number of hours.
pub fn hours_before(hours: i64) -> DateTime<Utc> {
    base_time() - Duration::hours(hours)
}

/// A segment with one point per timestamp, ending at the given times.
pub fn timed_segment(times: &[DateTime<Utc>]) -> Segment {
    Segment::new(
        times
            .iter()
            .enumerate()
            .map(|(i, t)| GpxPoint::new(55.0 + i as f64 * 0.001, 37.0).with_time(*t))
            .collect(),
    )
}

/// A segment whose points carry no timestamps.
pub fn untimed_segment(points: usize) -> Segment {
    Segment::new(
        (0..points)
            .map(|i| GpxPoint::new(55.0, 37.0 + i as f64 * 0.001))
            .collect(),
    )
}

/// A document with a single named track holding the given segments.
pub fn track_doc(name: &str, segments: Vec<Segment>) -> GpxDocument {
    let mut track = Track::named(name);
    track.segments = segments;
    let mut doc = GpxDocument::new();
    doc.tracks.push(track);
    doc
}

/// A document holding only named waypoints.
pub fn waypoint_doc(names: &[&str]) -> GpxDocument {
    let mut doc = GpxDocument::new();
    for (i, name) in names.iter().enumerate() {
        doc.waypoints
            .push(GpxPoint::new(55.7 + i as f64 * 0.01, 37.6).with_name(*name));
    }
    doc
}

/// Write a document as `<dir>/<name>.gpx` and return the path.
pub fn write_doc(dir: &Path, name: &str, doc: &GpxDocument) -> PathBuf {
    let path = dir.join(format!("{}.gpx", name));
    write_gpx_file(&path, doc).unwrap();
    path
}

/// Pipeline context writing its log and videos under `dir`.
pub fn test_context(dir: &Path, settings: crate::config::Settings) -> crate::orchestrator::Context {
    use std::sync::Arc;

    let logger = crate::logging::RunLogger::new(
        "test-run",
        dir.join(".logs"),
        settings.logging.log_config(),
        None,
    )
    .unwrap();
    crate::orchestrator::Context::new(settings, "test-run", dir.join("files"), Arc::new(logger))
}
