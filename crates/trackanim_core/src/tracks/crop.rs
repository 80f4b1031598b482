//! Cropping tracks by global point index.

use std::path::Path;

use crate::gpx::{parse_gpx_file, write_gpx_file, GpxDocument, Segment};

use super::types::{TrackError, TrackResult};

/// Keep track points whose document-wide index lies in `start..=end`.
///
/// Points are numbered across all tracks and segments in document order.
/// The result holds tracks only; segments and tracks with no surviving
/// point are removed. Point `<extensions>` are dropped, other unmodelled
/// elements are kept.
pub fn crop_by_index(doc: &GpxDocument, start: usize, end: usize) -> TrackResult<GpxDocument> {
    if start > end {
        return Err(TrackError::InvalidCrop(format!(
            "start {} is after end {}",
            start, end
        )));
    }

    let mut cropped = GpxDocument {
        version: doc.version.clone(),
        creator: doc.creator.clone(),
        namespaces: doc.namespaces.clone(),
        root_attributes: doc.root_attributes.clone(),
        ..GpxDocument::default()
    };

    let mut index = 0usize;
    for track in &doc.tracks {
        let mut segments = Vec::new();
        for segment in &track.segments {
            let points: Vec<_> = segment
                .points
                .iter()
                .enumerate()
                .filter(|(offset, _)| (start..=end).contains(&(index + offset)))
                .map(|(_, point)| {
                    let mut point = point.clone();
                    point.extra.retain(|e| e.name != "extensions");
                    point
                })
                .collect();
            index += segment.points.len();
            if !points.is_empty() {
                segments.push(Segment::new(points));
            }
        }
        if !segments.is_empty() {
            cropped.tracks.push(track.with_segments(segments));
        }
    }

    if !cropped.has_tracks() {
        return Err(TrackError::InvalidCrop(format!(
            "range {}..={} selects no points (document has {})",
            start, end, index
        )));
    }

    Ok(cropped)
}

/// Crop a file in place. Returns the number of points left.
pub fn crop_file(path: &Path, start: usize, end: usize) -> TrackResult<usize> {
    let doc = parse_gpx_file(path).map_err(|e| TrackError::read(path, e))?;
    let cropped = crop_by_index(&doc, start, end)?;
    write_gpx_file(path, &cropped).map_err(|e| TrackError::write(path, e))?;

    let remaining = cropped.track_point_count();
    tracing::info!(
        "Cropped {} to points {}..={} ({} of {} left)",
        path.display(),
        start,
        end,
        remaining,
        doc.track_point_count()
    );
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpx::{RawElement, Track};
    use crate::test_support::{hours_before, timed_segment, waypoint_doc, write_doc};
    use tempfile::tempdir;

    /// Two tracks: "a" with segments of 3 and 2 points, "b" with 4 points.
    fn sample() -> GpxDocument {
        let mut a = Track::named("a");
        a.segments = vec![
            timed_segment(&[hours_before(9), hours_before(8), hours_before(7)]),
            timed_segment(&[hours_before(6), hours_before(5)]),
        ];
        let mut b = Track::named("b");
        b.segments = vec![timed_segment(&[
            hours_before(4),
            hours_before(3),
            hours_before(2),
            hours_before(1),
        ])];

        let mut doc = waypoint_doc(&["poi"]);
        doc.tracks = vec![a, b];
        doc
    }

    #[test]
    fn range_spans_segments_and_tracks() {
        let cropped = crop_by_index(&sample(), 4, 6).unwrap();

        assert_eq!(cropped.tracks.len(), 2);
        assert_eq!(cropped.tracks[0].name.as_deref(), Some("a"));
        assert_eq!(cropped.tracks[0].segments.len(), 1);
        assert_eq!(cropped.tracks[0].segments[0].points.len(), 1);
        assert_eq!(cropped.tracks[1].point_count(), 2);
        assert_eq!(
            cropped.tracks[1].segments[0].points[1].time,
            Some(hours_before(3))
        );
        assert!(cropped.waypoints.is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let cropped = crop_by_index(&sample(), 0, 0).unwrap();
        assert_eq!(cropped.track_point_count(), 1);

        let cropped = crop_by_index(&sample(), 8, 100).unwrap();
        assert_eq!(cropped.track_point_count(), 1);
        assert_eq!(cropped.tracks[0].name.as_deref(), Some("b"));
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!(matches!(
            crop_by_index(&sample(), 5, 2),
            Err(TrackError::InvalidCrop(_))
        ));
        assert!(matches!(
            crop_by_index(&sample(), 9, 12),
            Err(TrackError::InvalidCrop(_))
        ));
    }

    #[test]
    fn crop_file_rewrites_in_place() {
        let dir = tempdir().unwrap();
        let path = write_doc(dir.path(), "track", &sample());

        assert_eq!(crop_file(&path, 2, 5).unwrap(), 4);
        let doc = parse_gpx_file(&path).unwrap();
        assert_eq!(doc.track_point_count(), 4);
        assert!(doc.waypoints.is_empty());
    }

    #[test]
    fn drops_point_extensions_only() {
        let mut doc = sample();
        let point = &mut doc.tracks[0].segments[0].points[0];
        point.extra.push(RawElement::new("hdop", "<hdop>1.5</hdop>"));
        point.extra.push(RawElement::new(
            "extensions",
            "<extensions><hr>120</hr></extensions>",
        ));
        doc.tracks[0].extra.push(RawElement::new("number", "<number>1</number>"));

        let cropped = crop_by_index(&doc, 0, 1).unwrap();
        let point = &cropped.tracks[0].segments[0].points[0];
        assert_eq!(point.extra, vec![RawElement::new("hdop", "<hdop>1.5</hdop>")]);
        assert_eq!(cropped.tracks[0].extra, doc.tracks[0].extra);
    }
}
