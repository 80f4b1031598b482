//! Classify step - parses every input file and picks out the tracks.

use crate::models::TrackClass;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AnimationState, Context, StepOutcome};
use crate::tracks::classify_file;

/// Parses inputs and seeds the active set with track-bearing files.
///
/// Files with neither tracks nor waypoints are dropped with a warning.
pub struct ClassifyStep;

impl ClassifyStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClassifyStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ClassifyStep {
    fn name(&self) -> &str {
        "Classify"
    }

    fn description(&self) -> &str {
        "Classify GPX files"
    }

    fn validate_input(&self, _ctx: &Context, state: &AnimationState) -> StepResult<()> {
        if state.inputs.is_empty() {
            return Err(StepError::NoInputFiles);
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut AnimationState) -> StepResult<StepOutcome> {
        let mut classified = Vec::with_capacity(state.inputs.len());
        for path in &state.inputs {
            let file = classify_file(path)?;
            match file.class {
                TrackClass::Neither => ctx.logger.warn(&format!(
                    "{} has no tracks or waypoints, ignoring",
                    path.display()
                )),
                class => ctx.logger.info(&format!(
                    "{}: {} ({} track point(s), {} waypoint(s))",
                    path.display(),
                    class,
                    file.document.track_point_count(),
                    file.document.waypoints.len()
                )),
            }
            classified.push(file);
        }

        state.active = classified
            .iter()
            .filter(|f| f.is_track_bearing())
            .map(|f| f.path.clone())
            .collect();
        state.classified = classified;

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &AnimationState) -> StepResult<()> {
        if state.active.is_empty() {
            return Err(StepError::NoTrackFiles);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::gpx::GpxDocument;
    use crate::test_support::{
        hours_before, test_context, timed_segment, track_doc, waypoint_doc, write_doc,
    };
    use tempfile::tempdir;

    #[test]
    fn empty_request_rejected() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());

        let err = ClassifyStep::new()
            .validate_input(&ctx, &AnimationState::default())
            .unwrap_err();
        assert!(matches!(err, StepError::NoInputFiles));
    }

    #[test]
    fn keeps_only_tracks_active() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let empty = write_doc(dir.path(), "empty", &GpxDocument::new());
        let pois = write_doc(dir.path(), "pois", &waypoint_doc(&["a"]));
        let track = write_doc(
            dir.path(),
            "track",
            &track_doc("t", vec![timed_segment(&[hours_before(1)])]),
        );

        let step = ClassifyStep::new();
        let mut state = AnimationState::new(vec![empty, pois, track.clone()]);
        assert_eq!(step.execute(&ctx, &mut state).unwrap(), StepOutcome::Success);
        step.validate_output(&ctx, &state).unwrap();

        assert_eq!(state.classified.len(), 3);
        assert_eq!(state.active, vec![track]);
    }

    #[test]
    fn malformed_file_is_named() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let bad = dir.path().join("bad.gpx");
        std::fs::write(&bad, "not xml at all").unwrap();

        let mut state = AnimationState::new(vec![bad.clone()]);
        let err = ClassifyStep::new().execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, StepError::MalformedFile { ref path, .. } if *path == bad));
    }
}
