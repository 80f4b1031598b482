//! GPX XML parsing.
//!
//! Handles GPX 1.0 and 1.1 documents:
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <gpx version="1.1" creator="Watch" xmlns="http://www.topografix.com/GPX/1/1">
//!   <wpt lat="55.75" lon="37.61"><name>Start</name></wpt>
//!   <trk>
//!     <name>Morning run</name>
//!     <trkseg>
//!       <trkpt lat="55.75" lon="37.61"><time>2024-05-01T06:00:00Z</time></trkpt>
//!     </trkseg>
//!   </trk>
//! </gpx>
//! ```
//!
//! Elements without a modelled field (`<extensions>`, `<link>` and the like)
//! are kept as [`RawElement`]s so a rewrite can put them back verbatim.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use roxmltree::Node;

use super::types::{
    GpxDocument, GpxError, GpxMetadata, GpxPoint, GpxResult, RawElement, Route, Segment, Track,
};

/// Parse a GPX file from disk.
pub fn parse_gpx_file(path: &Path) -> GpxResult<GpxDocument> {
    let content = std::fs::read_to_string(path)?;
    parse_gpx_str(&content)
}

/// Parse a GPX document from a string.
pub fn parse_gpx_str(xml: &str) -> GpxResult<GpxDocument> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| GpxError::MalformedXml(format!("XML parse error: {}", e)))?;

    let root = doc.root_element();
    if root.tag_name().name() != "gpx" {
        return Err(GpxError::InvalidDocument(format!(
            "Root element must be <gpx>, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut gpx = GpxDocument {
        version: root.attribute("version").unwrap_or("1.1").to_string(),
        creator: root.attribute("creator").map(str::to_string),
        root_attributes: root
            .attributes()
            .filter(|a| a.namespace().is_some() || !matches!(a.name(), "version" | "creator"))
            .map(|a| xml[a.range()].to_string())
            .collect(),
        namespaces: prefixed_namespaces(&doc),
        ..GpxDocument::default()
    };

    // GPX 1.0 keeps name/desc/time directly under <gpx>
    let mut legacy_meta = GpxMetadata::default();

    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "metadata" => gpx.metadata = Some(parse_metadata(&child)),
            "name" => legacy_meta.name = element_text(&child),
            "desc" => legacy_meta.desc = element_text(&child),
            "time" => legacy_meta.time = child.text().and_then(parse_gpx_time),
            "wpt" => gpx.waypoints.push(parse_point(&child)?),
            "rte" => gpx.routes.push(parse_route(&child)?),
            "trk" => gpx.tracks.push(parse_track(&child)?),
            _ => gpx.extra.push(raw_element(&child)),
        }
    }

    if gpx.metadata.is_none() && !legacy_meta.is_empty() {
        gpx.metadata = Some(legacy_meta);
    }

    Ok(gpx)
}

/// Parse an `xsd:dateTime` value.
///
/// Values without an offset are read as UTC. Returns `None` for anything
/// that cannot be parsed.
pub fn parse_gpx_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    tracing::warn!("Ignoring unparseable GPX timestamp '{}'", text);
    None
}

fn parse_metadata(node: &Node) -> GpxMetadata {
    let mut meta = GpxMetadata::default();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "name" => meta.name = element_text(&child),
            "desc" => meta.desc = element_text(&child),
            "time" => meta.time = child.text().and_then(parse_gpx_time),
            _ => meta.extra.push(raw_element(&child)),
        }
    }
    meta
}

fn parse_route(node: &Node) -> GpxResult<Route> {
    let mut route = Route::default();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "name" => route.name = element_text(&child),
            "desc" => route.desc = element_text(&child),
            "rtept" => route.points.push(parse_point(&child)?),
            _ => route.extra.push(raw_element(&child)),
        }
    }
    Ok(route)
}

fn parse_track(node: &Node) -> GpxResult<Track> {
    let mut track = Track::default();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "name" => track.name = element_text(&child),
            "cmt" => track.cmt = element_text(&child),
            "desc" => track.desc = element_text(&child),
            "type" => track.track_type = element_text(&child),
            "trkseg" => track.segments.push(parse_segment(&child)?),
            _ => track.extra.push(raw_element(&child)),
        }
    }
    Ok(track)
}

fn parse_segment(node: &Node) -> GpxResult<Segment> {
    let mut segment = Segment::default();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "trkpt" => segment.points.push(parse_point(&child)?),
            _ => segment.extra.push(raw_element(&child)),
        }
    }
    Ok(segment)
}

/// Parse a `wpt`, `rtept` or `trkpt` element.
fn parse_point(node: &Node) -> GpxResult<GpxPoint> {
    let lat = coordinate(node, "lat")?;
    let lon = coordinate(node, "lon")?;
    let mut point = GpxPoint::new(lat, lon);

    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "ele" => point.ele = child.text().and_then(|t| t.trim().parse().ok()),
            "time" => point.time = child.text().and_then(parse_gpx_time),
            "name" => point.name = element_text(&child),
            "cmt" => point.cmt = element_text(&child),
            "desc" => point.desc = element_text(&child),
            "sym" => point.sym = element_text(&child),
            "type" => point.point_type = element_text(&child),
            _ => point.extra.push(raw_element(&child)),
        }
    }

    Ok(point)
}

fn coordinate(node: &Node, attr: &str) -> GpxResult<f64> {
    let raw = node.attribute(attr).ok_or_else(|| {
        GpxError::InvalidDocument(format!(
            "<{}> is missing the '{}' attribute",
            node.tag_name().name(),
            attr
        ))
    })?;

    raw.trim().parse().map_err(|_| {
        GpxError::InvalidDocument(format!(
            "<{}> has a non-numeric '{}' value: {}",
            node.tag_name().name(),
            attr,
            raw
        ))
    })
}

/// Keep an element we have no field for, byte for byte.
fn raw_element(node: &Node) -> RawElement {
    let source = node.document().input_text();
    RawElement::new(node.tag_name().name(), &source[node.range()])
}

/// Every prefixed namespace in scope anywhere in the document, first
/// binding of each prefix wins. Raw elements rely on these when written
/// back under a fresh root.
fn prefixed_namespaces(doc: &roxmltree::Document) -> Vec<(String, String)> {
    let mut found: Vec<(String, String)> = Vec::new();
    for node in doc.descendants().filter(Node::is_element) {
        for ns in node.namespaces() {
            if let Some(prefix) = ns.name().filter(|p| *p != "xml") {
                if !found.iter().any(|(p, _)| p == prefix) {
                    found.push((prefix.to_string(), ns.uri().to_string()));
                }
            }
        }
    }
    found
}

fn element_text(node: &Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Watch" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><name>Weekend</name></metadata>
  <wpt lat="55.75" lon="37.61"><name>Start</name><sym>Flag</sym></wpt>
  <trk>
    <name>Morning run</name>
    <desc>Easy pace</desc>
    <trkseg>
      <trkpt lat="55.751" lon="37.611">
        <ele>150.5</ele>
        <time>2024-05-01T06:00:00Z</time>
        <extensions><hr>120</hr></extensions>
      </trkpt>
      <trkpt lat="55.752" lon="37.612"><time>2024-05-01T06:00:05Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="55.753" lon="37.613"/>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn parses_tracks_and_waypoints() {
        let doc = parse_gpx_str(SAMPLE).unwrap();

        assert_eq!(doc.version, "1.1");
        assert_eq!(doc.creator.as_deref(), Some("Watch"));
        assert_eq!(doc.metadata.unwrap().name.as_deref(), Some("Weekend"));

        assert_eq!(doc.waypoints.len(), 1);
        assert_eq!(doc.waypoints[0].name.as_deref(), Some("Start"));
        assert_eq!(doc.waypoints[0].sym.as_deref(), Some("Flag"));

        assert_eq!(doc.tracks.len(), 1);
        let track = &doc.tracks[0];
        assert_eq!(track.name.as_deref(), Some("Morning run"));
        assert_eq!(track.desc.as_deref(), Some("Easy pace"));
        assert_eq!(track.segments.len(), 2);
        assert_eq!(track.segments[0].points[0].ele, Some(150.5));
        assert_eq!(
            track.segments[0].points[1].time,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 5).unwrap())
        );
        assert_eq!(track.segments[1].points[0].time, None);
    }

    #[test]
    fn reads_gpx10_root_metadata() {
        let xml = r#"<gpx version="1.0" creator="old"><name>Legacy</name><time>2020-01-01T00:00:00Z</time></gpx>"#;
        let doc = parse_gpx_str(xml).unwrap();
        let meta = doc.metadata.unwrap();
        assert_eq!(meta.name.as_deref(), Some("Legacy"));
        assert!(meta.time.is_some());
    }

    #[test]
    fn rejects_non_gpx_root() {
        let result = parse_gpx_str("<kml></kml>");
        assert!(matches!(result, Err(GpxError::InvalidDocument(_))));
    }

    #[test]
    fn rejects_broken_xml() {
        let result = parse_gpx_str("<gpx><trk>");
        assert!(matches!(result, Err(GpxError::MalformedXml(_))));
    }

    #[test]
    fn rejects_point_without_coordinates() {
        let xml = r#"<gpx version="1.1"><wpt lon="1.0"/></gpx>"#;
        let err = parse_gpx_str(xml).unwrap_err();
        assert!(err.to_string().contains("lat"));
    }

    #[test]
    fn time_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
        assert_eq!(parse_gpx_time("2024-05-01T06:00:00Z"), Some(expected));
        assert_eq!(parse_gpx_time("2024-05-01T09:00:00+03:00"), Some(expected));
        assert_eq!(parse_gpx_time(" 2024-05-01T06:00:00 "), Some(expected));
        assert!(parse_gpx_time("2024-05-01T06:00:00.250Z").is_some());
        assert_eq!(parse_gpx_time("yesterday"), None);
    }
}
