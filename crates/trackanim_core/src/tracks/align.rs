//! Temporal alignment: trim stale segments so every rendered track ends
//! inside a common recency window.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::AlignmentSettings;
use crate::gpx::{parse_gpx_file, write_gpx_file, GpxDocument};
use crate::models::{EmptyFilePolicy, ReferencePolicy, RewritePolicy, UntimedFilePolicy};

use super::types::{TrackError, TrackResult};

/// Knobs controlling how files are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentPolicy {
    pub window: Duration,
    pub reference: ReferencePolicy,
    pub rewrite: RewritePolicy,
    pub empty_files: EmptyFilePolicy,
    pub untimed_files: UntimedFilePolicy,
}

impl Default for AlignmentPolicy {
    fn default() -> Self {
        Self::from(&AlignmentSettings::default())
    }
}

impl From<&AlignmentSettings> for AlignmentPolicy {
    fn from(settings: &AlignmentSettings) -> Self {
        Self {
            window: settings.recency_window(),
            reference: settings.reference,
            rewrite: settings.rewrite,
            empty_files: settings.empty_files,
            untimed_files: settings.untimed_files,
        }
    }
}

/// Result of trimming one document against a reference instant.
#[derive(Debug, Clone)]
pub struct TrimmedDocument {
    /// The document with only recent segments left in its tracks.
    pub document: GpxDocument,
    pub kept_segments: usize,
    /// Segments older than the window.
    pub stale_segments: usize,
    /// Segments without a single timestamp.
    pub untimed_segments: usize,
}

impl TrimmedDocument {
    pub fn dropped_segments(&self) -> usize {
        self.stale_segments + self.untimed_segments
    }

    pub fn has_tracks(&self) -> bool {
        self.document.has_tracks()
    }
}

/// Keep segments whose latest timestamp is strictly less than `window`
/// before `reference`.
///
/// Tracks keep their descriptive fields; tracks left without segments are
/// removed. Everything outside `<trk>` is carried over unchanged.
pub fn trim_document(
    doc: &GpxDocument,
    reference: DateTime<Utc>,
    window: Duration,
) -> TrimmedDocument {
    let window = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);

    let mut kept_segments = 0;
    let mut stale_segments = 0;
    let mut untimed_segments = 0;
    let mut tracks = Vec::with_capacity(doc.tracks.len());

    for track in &doc.tracks {
        let mut segments = Vec::new();
        for segment in &track.segments {
            match segment.latest_time() {
                None => untimed_segments += 1,
                Some(latest) if reference.signed_duration_since(latest) < window => {
                    kept_segments += 1;
                    segments.push(segment.clone());
                }
                Some(_) => stale_segments += 1,
            }
        }
        if !segments.is_empty() {
            tracks.push(track.with_segments(segments));
        }
    }

    let mut document = doc.clone();
    document.tracks = tracks;

    TrimmedDocument {
        document,
        kept_segments,
        stale_segments,
        untimed_segments,
    }
}

/// What happened to one file during alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAlignment {
    pub path: PathBuf,
    pub kept: usize,
    pub dropped: usize,
    /// The file on disk was overwritten with the trimmed document.
    pub rewritten: bool,
    /// The file stays in the set handed to the renderer.
    pub active: bool,
    /// The file had no timestamped point at all.
    pub untimed: bool,
}

/// Per-file alignment results, in input order.
#[derive(Debug, Clone, Default)]
pub struct AlignmentReport {
    pub reference: Option<DateTime<Utc>>,
    pub files: Vec<FileAlignment>,
}

impl AlignmentReport {
    /// Paths that remain active, in input order.
    pub fn active_paths(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|f| f.active)
            .map(|f| f.path.clone())
            .collect()
    }

    pub fn rewritten_count(&self) -> usize {
        self.files.iter().filter(|f| f.rewritten).count()
    }
}

/// Trim every track-bearing file in `paths` according to `policy`.
///
/// Files are re-read from disk so a preceding waypoint merge is honored.
pub fn align_files(paths: &[PathBuf], policy: &AlignmentPolicy) -> TrackResult<AlignmentReport> {
    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let doc = parse_gpx_file(path).map_err(|e| TrackError::read(path, e))?;
        docs.push((path, doc));
    }

    let global = docs.iter().filter_map(|(_, doc)| doc.latest_time()).max();
    let mut report = AlignmentReport {
        reference: match policy.reference {
            ReferencePolicy::PerFile => None,
            ReferencePolicy::Global => global,
        },
        files: Vec::with_capacity(docs.len()),
    };

    for (path, doc) in &docs {
        let latest = doc.latest_time();
        let reference = match policy.reference {
            ReferencePolicy::PerFile => latest,
            ReferencePolicy::Global => latest.and(global),
        };

        let file = match reference {
            Some(reference) => align_one(path, doc, reference, policy)?,
            None => {
                let active = policy.untimed_files == UntimedFilePolicy::Render;
                tracing::warn!(
                    "{} has no timestamped points ({})",
                    path.display(),
                    if active { "rendering as is" } else { "dropped" }
                );
                FileAlignment {
                    path: path.to_path_buf(),
                    kept: 0,
                    dropped: 0,
                    rewritten: false,
                    active,
                    untimed: true,
                }
            }
        };
        report.files.push(file);
    }

    Ok(report)
}

fn align_one(
    path: &Path,
    doc: &GpxDocument,
    reference: DateTime<Utc>,
    policy: &AlignmentPolicy,
) -> TrackResult<FileAlignment> {
    let trimmed = trim_document(doc, reference, policy.window);
    let dropped = trimmed.dropped_segments();

    let (rewritten, active) = if trimmed.has_tracks() {
        let rewrite = match policy.rewrite {
            RewritePolicy::IfTracksRemain => true,
            RewritePolicy::WhenFiltered => dropped > 0,
        };
        if rewrite {
            write_gpx_file(path, &trimmed.document).map_err(|e| TrackError::write(path, e))?;
        }
        (rewrite, true)
    } else {
        (false, policy.empty_files == EmptyFilePolicy::Keep)
    };

    tracing::debug!(
        "{}: kept {} segment(s), dropped {} (rewritten: {}, active: {})",
        path.display(),
        trimmed.kept_segments,
        dropped,
        rewritten,
        active
    );

    Ok(FileAlignment {
        path: path.to_path_buf(),
        kept: trimmed.kept_segments,
        dropped,
        rewritten,
        active,
        untimed: false,
    })
}
