//! Render dispatch - hands the active files to the renderer.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::models::RenderJob;
use crate::render::{assign_colors, Renderer};

use super::errors::{StepError, StepResult};
use super::types::Context;

/// Render `active` into a fresh `<work_dir>/<uuid>.mp4`.
///
/// Success is judged only by the destination existing after the renderer
/// exits; the exit code is logged and otherwise ignored. A failure carries
/// the renderer's stderr, or the exit status when stderr is empty.
pub async fn dispatch<R: Renderer>(
    ctx: &Context,
    renderer: &R,
    active: &[PathBuf],
) -> StepResult<PathBuf> {
    let absolute: Vec<PathBuf> = active
        .iter()
        .map(|p| absolutize(p))
        .collect::<StepResult<_>>()?;
    let inputs = assign_colors(&absolute)?;

    fs::create_dir_all(&ctx.work_dir)
        .map_err(|e| StepError::io_error("creating work directory", e))?;
    let job = RenderJob {
        inputs,
        destination: absolutize(&ctx.work_dir)?.join(format!("{}.mp4", Uuid::new_v4())),
    };

    for input in &job.inputs {
        ctx.logger
            .debug(&format!("{} -> {}", input.path.display(), input.color));
    }

    let args = renderer.build_args(&job.inputs, &job.destination)?;
    ctx.logger.command(&args.join(" "));

    let output = renderer.invoke(&args).await?;

    let stdout = output.stdout_text();
    for line in stdout.lines() {
        ctx.logger.output_line(line, false);
    }
    let stderr = output.stderr_text();
    for line in stderr.lines() {
        ctx.logger.output_line(line, true);
    }

    match output.status {
        Some(code) => ctx
            .logger
            .info(&format!("{} exited with code {}", renderer.name(), code)),
        None => ctx
            .logger
            .warn(&format!("{} was terminated by a signal", renderer.name())),
    }

    if job.destination.exists() {
        ctx.logger
            .success(&format!("Video written to {}", job.destination.display()));
        Ok(job.destination)
    } else {
        ctx.logger.show_tail(renderer.name());
        if stderr.trim().is_empty() {
            let status = match output.status {
                Some(code) => format!("exit code {}", code),
                None => "terminated by a signal".to_string(),
            };
            Err(StepError::render_failed(format!(
                "{} produced no video ({})",
                renderer.name(),
                status
            )))
        } else {
            Err(StepError::render_failed(stderr))
        }
    }
}

fn absolutize(path: &Path) -> StepResult<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| StepError::io_error(format!("resolving {}", path.display()), e))
}
