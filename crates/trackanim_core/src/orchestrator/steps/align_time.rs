//! Align step - trims stale segments so tracks end close together.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AnimationState, Context, StepOutcome};
use crate::tracks::{align_files, AlignmentPolicy};

/// Applies the `[alignment]` policy to the active files.
pub struct AlignTimeStep;

impl AlignTimeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AlignTimeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for AlignTimeStep {
    fn name(&self) -> &str {
        "AlignTime"
    }

    fn description(&self) -> &str {
        "Align tracks in time"
    }

    fn validate_input(&self, _ctx: &Context, state: &AnimationState) -> StepResult<()> {
        if state.active.is_empty() {
            return Err(StepError::NoTrackFiles);
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut AnimationState) -> StepResult<StepOutcome> {
        let settings = &ctx.settings.alignment;
        if !settings.enabled {
            return Ok(StepOutcome::Skipped("alignment disabled".to_string()));
        }

        let policy = AlignmentPolicy::from(settings);
        ctx.logger.debug(&format!(
            "Window {:?}, reference {:?}, rewrite {:?}",
            policy.window, policy.reference, policy.rewrite
        ));

        let report = align_files(&state.active, &policy)?;
        for file in &report.files {
            if file.untimed {
                ctx.logger.warn(&format!(
                    "{} has no timestamps{}",
                    file.path.display(),
                    if file.active { "" } else { ", dropped" }
                ));
            } else if !file.active {
                ctx.logger.info(&format!(
                    "{}: nothing recent left, dropped",
                    file.path.display()
                ));
            } else {
                ctx.logger.info(&format!(
                    "{}: kept {} segment(s), dropped {}",
                    file.path.display(),
                    file.kept,
                    file.dropped
                ));
            }
        }

        state.active = report.active_paths();
        if let Some(merge) = &state.merge {
            if !state.active.contains(&merge.target) {
                ctx.logger.warn(&format!(
                    "{} was dropped, its merged waypoints will not be rendered",
                    merge.target.display()
                ));
            }
        }
        state.alignment = Some(report);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &AnimationState) -> StepResult<()> {
        if state.active.is_empty() {
            return Err(StepError::NoTrackFiles);
        }
        Ok(())
    }
}
