//! Waypoint merging into the first track-bearing file.

use std::path::PathBuf;

use crate::gpx::{parse_gpx_file, write_gpx_file};
use crate::models::ClassifiedFile;

use super::types::{TrackError, TrackResult};

/// What a merge did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// File that received the waypoints.
    pub target: PathBuf,
    /// Number of waypoint-only source files.
    pub sources: usize,
    /// Waypoints appended to the target.
    pub appended: usize,
    /// Waypoints skipped because the target already held them on disk.
    pub duplicates: usize,
}

/// Append waypoints from every waypoint-only file to the first
/// track-bearing file, in input order.
///
/// Returns `Ok(None)` when there are no waypoint-only files. The target is
/// re-read from disk so edits made after classification are not lost, and
/// it is only rewritten when something was appended. Duplicates are judged
/// against the target as read, so equal waypoints from two sources are both
/// appended.
pub fn merge_waypoints(files: &[ClassifiedFile]) -> TrackResult<Option<MergeReport>> {
    let sources: Vec<&ClassifiedFile> = files.iter().filter(|f| f.is_waypoint_only()).collect();
    if sources.is_empty() {
        return Ok(None);
    }

    let target = files
        .iter()
        .find(|f| f.is_track_bearing())
        .ok_or(TrackError::NoTrackFiles)?;

    let mut doc = parse_gpx_file(&target.path).map_err(|e| TrackError::read(&target.path, e))?;

    let existing = doc.waypoints.clone();
    let mut appended = 0;
    let mut duplicates = 0;
    for source in &sources {
        for waypoint in &source.document.waypoints {
            if existing.contains(waypoint) {
                duplicates += 1;
                continue;
            }
            doc.waypoints.push(waypoint.clone());
            appended += 1;
        }
        // raw waypoint elements may use prefixes bound only in their source
        for (prefix, uri) in &source.document.namespaces {
            if !doc.namespaces.iter().any(|(p, _)| p == prefix) {
                doc.namespaces.push((prefix.clone(), uri.clone()));
            }
        }
    }

    if appended > 0 {
        write_gpx_file(&target.path, &doc).map_err(|e| TrackError::write(&target.path, e))?;
    }

    tracing::info!(
        "Merged {} waypoint(s) from {} file(s) into {} ({} already present)",
        appended,
        sources.len(),
        target.path.display(),
        duplicates
    );

    Ok(Some(MergeReport {
        target: target.path.clone(),
        sources: sources.len(),
        appended,
        duplicates,
    }))
}
