//! GPX document types and error definitions.
//!
//! A single [`GpxPoint`] type is used for waypoints, route points and
//! track points, mirroring the shared `wptType` of the GPX schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing GPX documents.
#[derive(Error, Debug)]
pub enum GpxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("Invalid GPX document: {0}")]
    InvalidDocument(String),
}

/// Result type for GPX operations.
pub type GpxResult<T> = Result<T, GpxError>;

/// A parsed GPX document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpxDocument {
    /// Schema version from the root element ("1.0" or "1.1").
    pub version: String,
    /// Creating application, if declared.
    pub creator: Option<String>,
    /// Document-level metadata.
    pub metadata: Option<GpxMetadata>,
    /// Standalone points of interest.
    pub waypoints: Vec<GpxPoint>,
    /// Planned routes.
    pub routes: Vec<Route>,
    /// Recorded tracks.
    pub tracks: Vec<Track>,
    /// Prefixed namespace declarations (`prefix`, `uri`) in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<(String, String)>,
    /// Root attributes other than `version` and `creator`, as written.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_attributes: Vec<String>,
    /// Child elements without a field of their own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl Default for GpxDocument {
    fn default() -> Self {
        Self {
            version: "1.1".to_string(),
            creator: None,
            metadata: None,
            waypoints: Vec::new(),
            routes: Vec::new(),
            tracks: Vec::new(),
            namespaces: Vec::new(),
            root_attributes: Vec::new(),
            extra: Vec::new(),
        }
    }
}

impl GpxDocument {
    /// Create an empty GPX 1.1 document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the document contains at least one track object.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Whether the document contains standalone waypoints.
    pub fn has_waypoints(&self) -> bool {
        !self.waypoints.is_empty()
    }

    /// Latest timestamp over all track points.
    pub fn latest_time(&self) -> Option<DateTime<Utc>> {
        self.tracks.iter().filter_map(Track::latest_time).max()
    }

    /// Earliest timestamp over all track points.
    pub fn earliest_time(&self) -> Option<DateTime<Utc>> {
        self.tracks
            .iter()
            .flat_map(|t| t.segments.iter())
            .flat_map(|s| s.points.iter())
            .filter_map(|p| p.time)
            .min()
    }

    /// Total number of track points.
    pub fn track_point_count(&self) -> usize {
        self.tracks.iter().map(Track::point_count).sum()
    }

    /// Number of track points carrying a timestamp.
    pub fn timed_point_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(|t| t.segments.iter())
            .flat_map(|s| s.points.iter())
            .filter(|p| p.time.is_some())
            .count()
    }
}

/// Document metadata (`<metadata>`, or the root-level fields of GPX 1.0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpxMetadata {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl GpxMetadata {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.desc.is_none() && self.time.is_none() && self.extra.is_empty()
    }
}

/// An element the model has no field for, kept as source XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawElement {
    /// Local tag name, used to put the element back in schema order.
    pub name: String,
    /// The element exactly as it appeared in the source.
    pub xml: String,
}

impl RawElement {
    pub fn new(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xml: xml.into(),
        }
    }
}

/// A geographic point with optional timing and descriptive fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpxPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Elevation in meters.
    pub ele: Option<f64>,
    /// Time the point was recorded.
    pub time: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub sym: Option<String>,
    pub point_type: Option<String>,
    /// Child elements without a field of their own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl GpxPoint {
    /// Create a point with only coordinates set.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
            name: None,
            cmt: None,
            desc: None,
            sym: None,
            point_type: None,
            extra: Vec::new(),
        }
    }

    /// Set the timestamp.
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the elevation.
    pub fn with_ele(mut self, ele: f64) -> Self {
        self.ele = Some(ele);
        self
    }
}

/// A planned route (`<rte>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub points: Vec<GpxPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

/// A recorded track (`<trk>`): an ordered list of segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub track_type: Option<String>,
    pub segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl Track {
    /// Create a named track without segments.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Copy of this track's descriptive fields with a new segment list.
    pub fn with_segments(&self, segments: Vec<Segment>) -> Self {
        Self {
            name: self.name.clone(),
            cmt: self.cmt.clone(),
            desc: self.desc.clone(),
            track_type: self.track_type.clone(),
            segments,
            extra: self.extra.clone(),
        }
    }

    /// Latest timestamp over all segments.
    pub fn latest_time(&self) -> Option<DateTime<Utc>> {
        self.segments.iter().filter_map(Segment::latest_time).max()
    }

    /// Number of points over all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }
}

/// A contiguous run of track points (`<trkseg>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub points: Vec<GpxPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl Segment {
    pub fn new(points: Vec<GpxPoint>) -> Self {
        Self {
            points,
            extra: Vec::new(),
        }
    }

    /// Latest timestamp in this segment, ignoring untimed points.
    pub fn latest_time(&self) -> Option<DateTime<Utc>> {
        self.points.iter().filter_map(|p| p.time).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn segment_latest_ignores_untimed_points() {
        let segment = Segment::new(vec![
            GpxPoint::new(1.0, 1.0).with_time(at(3)),
            GpxPoint::new(1.0, 1.1),
            GpxPoint::new(1.0, 1.2).with_time(at(5)),
        ]);
        assert_eq!(segment.latest_time(), Some(at(5)));
        assert_eq!(Segment::new(vec![GpxPoint::new(0.0, 0.0)]).latest_time(), None);
    }

    #[test]
    fn document_time_bounds_span_tracks() {
        let mut doc = GpxDocument::new();
        let mut a = Track::named("a");
        a.segments.push(Segment::new(vec![GpxPoint::new(0.0, 0.0).with_time(at(2))]));
        let mut b = Track::named("b");
        b.segments.push(Segment::new(vec![
            GpxPoint::new(0.0, 0.0).with_time(at(7)),
            GpxPoint::new(0.0, 0.0),
        ]));
        doc.tracks = vec![a, b];

        assert_eq!(doc.latest_time(), Some(at(7)));
        assert_eq!(doc.earliest_time(), Some(at(2)));
        assert_eq!(doc.track_point_count(), 3);
        assert_eq!(doc.timed_point_count(), 2);
    }

    #[test]
    fn with_segments_keeps_descriptive_fields() {
        let mut track = Track::named("Morning run");
        track.desc = Some("easy".to_string());
        track.extra.push(RawElement::new("number", "<number>3</number>"));
        track.segments.push(Segment::default());

        let copy = track.with_segments(Vec::new());
        assert_eq!(copy.name.as_deref(), Some("Morning run"));
        assert_eq!(copy.desc.as_deref(), Some("easy"));
        assert_eq!(copy.extra, track.extra);
        assert!(copy.segments.is_empty());
    }
}
