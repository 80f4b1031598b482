//! File classification.

use std::path::Path;

use crate::gpx::{parse_gpx_file, GpxDocument};
use crate::models::{ClassifiedFile, TrackClass};

use super::types::{TrackError, TrackResult};

/// Classify a parsed document.
///
/// A document is track-bearing if it has any `<trk>`, even an empty one.
pub fn classify(doc: &GpxDocument) -> TrackClass {
    if doc.has_tracks() {
        TrackClass::TrackBearing
    } else if doc.has_waypoints() {
        TrackClass::WaypointOnly
    } else {
        TrackClass::Neither
    }
}

/// Parse and classify a file on disk.
pub fn classify_file(path: &Path) -> TrackResult<ClassifiedFile> {
    let document = parse_gpx_file(path).map_err(|e| TrackError::read(path, e))?;
    let class = classify(&document);
    tracing::debug!("{} classified as {}", path.display(), class);

    Ok(ClassifiedFile {
        path: path.to_path_buf(),
        class,
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpx::Track;
    use crate::test_support::{hours_before, timed_segment, track_doc, waypoint_doc, write_doc};
    use tempfile::tempdir;

    #[test]
    fn track_wins_over_waypoints() {
        let mut doc = track_doc("run", vec![timed_segment(&[hours_before(1)])]);
        doc.waypoints = waypoint_doc(&["cafe"]).waypoints;
        assert_eq!(classify(&doc), TrackClass::TrackBearing);
    }

    #[test]
    fn empty_track_still_counts() {
        let mut doc = GpxDocument::new();
        doc.tracks.push(Track::default());
        assert_eq!(classify(&doc), TrackClass::TrackBearing);
    }

    #[test]
    fn waypoints_only() {
        assert_eq!(classify(&waypoint_doc(&["a", "b"])), TrackClass::WaypointOnly);
    }

    #[test]
    fn nothing_at_all() {
        assert_eq!(classify(&GpxDocument::new()), TrackClass::Neither);
    }

    #[test]
    fn classify_file_names_unreadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.gpx");
        std::fs::write(&path, "<gpx><trk>").unwrap();

        let err = classify_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.gpx"));
    }

    #[test]
    fn classify_file_keeps_document() {
        let dir = tempdir().unwrap();
        let path = write_doc(dir.path(), "pois", &waypoint_doc(&["a", "b", "c"]));

        let file = classify_file(&path).unwrap();
        assert!(file.is_waypoint_only());
        assert_eq!(file.document.waypoints.len(), 3);
        assert_eq!(file.path, path);
    }
}
