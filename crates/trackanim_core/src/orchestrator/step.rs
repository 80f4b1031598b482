//! Pipeline step trait definition.

use super::errors::StepResult;
use super::types::{AnimationState, Context, StepOutcome};

/// Trait for the synchronous steps that prepare files for rendering.
///
/// The pipeline runner calls these methods in order:
///
/// 1. `validate_input` - Check preconditions before execution
/// 2. `execute` - Perform the step's work
/// 3. `validate_output` - Verify the step left usable state behind
///
/// # Example
///
/// ```ignore
/// struct CountStep;
///
/// impl PipelineStep for CountStep {
///     fn name(&self) -> &str { "Count" }
///
///     fn validate_input(&self, _ctx: &Context, state: &AnimationState) -> StepResult<()> {
///         if state.inputs.is_empty() {
///             return Err(StepError::NoInputFiles);
///         }
///         Ok(())
///     }
///
///     fn execute(&self, ctx: &Context, state: &mut AnimationState) -> StepResult<StepOutcome> {
///         ctx.logger.info(&format!("{} file(s)", state.inputs.len()));
///         Ok(StepOutcome::Success)
///     }
/// }
/// ```
pub trait PipelineStep: Send + Sync {
    /// Get the step name (for logging and error context).
    fn name(&self) -> &str;

    /// Validate inputs before execution.
    fn validate_input(&self, ctx: &Context, state: &AnimationState) -> StepResult<()>;

    /// Execute the step's main work, recording results in `state`.
    ///
    /// Returns `StepOutcome::Skipped` if there was nothing to do.
    fn execute(&self, ctx: &Context, state: &mut AnimationState) -> StepResult<StepOutcome>;

    /// Validate outputs after a successful `execute`.
    fn validate_output(&self, _ctx: &Context, _state: &AnimationState) -> StepResult<()> {
        Ok(())
    }

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}
