//! GPX XML serialization.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use super::types::{GpxDocument, GpxMetadata, GpxPoint, RawElement, Route, Segment, Track};

const CREATOR: &str = "trackanim";

// Child sequences of the GPX 1.0 and 1.1 schemas, merged. Elements missing
// from a list are placed with the extensions.
const GPX_ORDER: &[&str] = &[
    "metadata", "name", "desc", "author", "email", "url", "urlname", "time", "keywords", "bounds",
    "wpt", "rte", "trk", "extensions",
];
const METADATA_ORDER: &[&str] = &[
    "name", "desc", "author", "copyright", "link", "time", "keywords", "bounds", "extensions",
];
const POINT_ORDER: &[&str] = &[
    "ele", "time", "course", "speed", "magvar", "geoidheight", "name", "cmt", "desc", "src",
    "link", "url", "urlname", "sym", "type", "fix", "sat", "hdop", "vdop", "pdop",
    "ageofdgpsdata", "dgpsid", "extensions",
];
const ROUTE_ORDER: &[&str] = &[
    "name", "cmt", "desc", "src", "link", "url", "urlname", "number", "type", "extensions",
    "rtept",
];
const TRACK_ORDER: &[&str] = &[
    "name", "cmt", "desc", "src", "link", "url", "urlname", "number", "type", "extensions",
    "trkseg",
];
const SEGMENT_ORDER: &[&str] = &["trkpt", "extensions"];

/// Serialize a document to GPX XML.
pub fn serialize_gpx(doc: &GpxDocument) -> String {
    let legacy = doc.version == "1.0";
    let namespace = if legacy {
        "http://www.topografix.com/GPX/1/0"
    } else {
        "http://www.topografix.com/GPX/1/1"
    };

    let mut attrs = format!(
        " version=\"{}\" creator=\"{}\" xmlns=\"{}\"",
        escape(&doc.version),
        escape(doc.creator.as_deref().unwrap_or(CREATOR)),
        namespace
    );
    for (prefix, uri) in &doc.namespaces {
        attrs.push_str(&format!(" xmlns:{}=\"{}\"", prefix, escape(uri)));
    }
    for attr in &doc.root_attributes {
        attrs.push(' ');
        attrs.push_str(attr);
    }

    let mut children = Children::new(GPX_ORDER, 1);
    if let Some(meta) = doc.metadata.as_ref().filter(|m| !m.is_empty()) {
        if legacy {
            // GPX 1.0 has no <metadata> wrapper
            add_metadata_fields(&mut children, meta);
        } else {
            let mut inner = Children::new(METADATA_ORDER, 2);
            add_metadata_fields(&mut inner, meta);
            children.push("metadata", inner.into_element("metadata", "", 1));
        }
    }
    for waypoint in &doc.waypoints {
        children.push("wpt", point_xml("wpt", waypoint, 1));
    }
    for route in &doc.routes {
        children.push("rte", route_xml(route));
    }
    for track in &doc.tracks {
        children.push("trk", track_xml(track));
    }
    children.raw(&doc.extra);

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&children.into_element("gpx", &attrs, 0));
    xml
}

/// Write a document to disk atomically.
///
/// Writes to a sibling temp file first, then renames over the target.
pub fn write_gpx_file(path: &Path, doc: &GpxDocument) -> io::Result<()> {
    let content = serialize_gpx(doc);
    let temp_path = path.with_extension("gpx.tmp");

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;
    tracing::debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Format a timestamp the way GPX expects it (`2024-05-01T06:00:00Z`).
pub fn format_gpx_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// The children of one element, written out in schema order.
struct Children<'a> {
    order: &'a [&'a str],
    depth: usize,
    parts: Vec<(usize, String)>,
}

impl<'a> Children<'a> {
    fn new(order: &'a [&'a str], depth: usize) -> Self {
        Self {
            order,
            depth,
            parts: Vec::new(),
        }
    }

    fn rank(&self, name: &str) -> usize {
        self.order
            .iter()
            .position(|n| *n == name)
            .or_else(|| self.order.iter().position(|n| *n == "extensions"))
            .unwrap_or(self.order.len())
    }

    /// Add an already serialized child.
    fn push(&mut self, name: &str, xml: String) {
        let rank = self.rank(name);
        self.parts.push((rank, xml));
    }

    fn text(&mut self, tag: &str, value: Option<&str>) {
        if let Some(value) = value {
            let xml = format!("{}<{tag}>{}</{tag}>\n", indent(self.depth), escape(value));
            self.push(tag, xml);
        }
    }

    fn raw(&mut self, elements: &[RawElement]) {
        for element in elements {
            let xml = format!("{}{}\n", indent(self.depth), element.xml);
            self.push(&element.name, xml);
        }
    }

    /// Wrap the children in `<tag attrs>`; `attrs` starts with a space.
    fn into_element(mut self, tag: &str, attrs: &str, depth: usize) -> String {
        let pad = indent(depth);
        if self.parts.is_empty() {
            return format!("{pad}<{tag}{attrs}/>\n");
        }

        // stable: equal ranks keep insertion order
        self.parts.sort_by_key(|(rank, _)| *rank);
        let mut xml = format!("{pad}<{tag}{attrs}>\n");
        for (_, part) in self.parts {
            xml.push_str(&part);
        }
        xml.push_str(&format!("{pad}</{tag}>\n"));
        xml
    }
}

fn add_metadata_fields(children: &mut Children<'_>, meta: &GpxMetadata) {
    children.text("name", meta.name.as_deref());
    children.text("desc", meta.desc.as_deref());
    if let Some(time) = &meta.time {
        children.text("time", Some(&format_gpx_time(time)));
    }
    children.raw(&meta.extra);
}

fn route_xml(route: &Route) -> String {
    let mut children = Children::new(ROUTE_ORDER, 2);
    children.text("name", route.name.as_deref());
    children.text("desc", route.desc.as_deref());
    children.raw(&route.extra);
    for point in &route.points {
        children.push("rtept", point_xml("rtept", point, 2));
    }
    children.into_element("rte", "", 1)
}

fn track_xml(track: &Track) -> String {
    let mut children = Children::new(TRACK_ORDER, 2);
    children.text("name", track.name.as_deref());
    children.text("cmt", track.cmt.as_deref());
    children.text("desc", track.desc.as_deref());
    children.text("type", track.track_type.as_deref());
    children.raw(&track.extra);
    for segment in &track.segments {
        children.push("trkseg", segment_xml(segment));
    }
    children.into_element("trk", "", 1)
}

fn segment_xml(segment: &Segment) -> String {
    let mut children = Children::new(SEGMENT_ORDER, 3);
    for point in &segment.points {
        children.push("trkpt", point_xml("trkpt", point, 3));
    }
    children.raw(&segment.extra);
    children.into_element("trkseg", "", 2)
}

fn point_xml(tag: &str, point: &GpxPoint, depth: usize) -> String {
    let mut children = Children::new(POINT_ORDER, depth + 1);
    if let Some(ele) = point.ele {
        children.text("ele", Some(&ele.to_string()));
    }
    if let Some(time) = &point.time {
        children.text("time", Some(&format_gpx_time(time)));
    }
    children.text("name", point.name.as_deref());
    children.text("cmt", point.cmt.as_deref());
    children.text("desc", point.desc.as_deref());
    children.text("sym", point.sym.as_deref());
    children.text("type", point.point_type.as_deref());
    children.raw(&point.extra);

    let attrs = format!(" lat=\"{}\" lon=\"{}\"", point.lat, point.lon);
    children.into_element(tag, &attrs, depth)
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Escape XML special characters in text and attribute values.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
