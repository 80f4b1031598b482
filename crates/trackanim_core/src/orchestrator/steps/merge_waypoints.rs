//! Merge step - folds waypoint-only files into the first track file.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AnimationState, Context, StepOutcome};
use crate::tracks::merge_waypoints;

/// Appends waypoints from waypoint-only inputs to the first track file.
pub struct MergeWaypointsStep;

impl MergeWaypointsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MergeWaypointsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for MergeWaypointsStep {
    fn name(&self) -> &str {
        "MergeWaypoints"
    }

    fn description(&self) -> &str {
        "Merge waypoints into first track"
    }

    fn validate_input(&self, _ctx: &Context, state: &AnimationState) -> StepResult<()> {
        if !state.has_classification() {
            return Err(StepError::NoInputFiles);
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut AnimationState) -> StepResult<StepOutcome> {
        let Some(report) = merge_waypoints(&state.classified)? else {
            return Ok(StepOutcome::Skipped("no waypoint-only files".to_string()));
        };

        ctx.logger.info(&format!(
            "Added {} waypoint(s) from {} file(s) to {}",
            report.appended,
            report.sources,
            report.target.display()
        ));
        if report.duplicates > 0 {
            ctx.logger.debug(&format!(
                "{} waypoint(s) were already present",
                report.duplicates
            ));
        }
        state.merge = Some(report);

        Ok(StepOutcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::orchestrator::steps::ClassifyStep;
    use crate::test_support::{
        hours_before, test_context, timed_segment, track_doc, waypoint_doc, write_doc,
    };
    use tempfile::tempdir;

    #[test]
    fn skipped_without_waypoint_files() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let track = write_doc(
            dir.path(),
            "t",
            &track_doc("t", vec![timed_segment(&[hours_before(1)])]),
        );

        let mut state = AnimationState::new(vec![track]);
        ClassifyStep::new().execute(&ctx, &mut state).unwrap();

        let outcome = MergeWaypointsStep::new().execute(&ctx, &mut state).unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(state.merge.is_none());
    }

    #[test]
    fn records_merge_report() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let pois = write_doc(dir.path(), "pois", &waypoint_doc(&["a", "b"]));
        let track = write_doc(
            dir.path(),
            "t",
            &track_doc("t", vec![timed_segment(&[hours_before(1)])]),
        );

        let mut state = AnimationState::new(vec![pois, track.clone()]);
        ClassifyStep::new().execute(&ctx, &mut state).unwrap();
        MergeWaypointsStep::new().execute(&ctx, &mut state).unwrap();

        let report = state.merge.unwrap();
        assert_eq!(report.target, track);
        assert_eq!(report.appended, 2);
    }
}
