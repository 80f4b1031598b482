//! Pipeline orchestrator turning a list of GPX files into a video.
//!
//! # Architecture
//!
//! ```text
//! animate_tracks
//!     ├── Pipeline
//!     │     ├── Step: Classify
//!     │     ├── Step: MergeWaypoints
//!     │     └── Step: AlignTime
//!     └── dispatch (async renderer call)
//! ```
//!
//! Every failure is terminal; the caller receives one
//! [`AnimationOutcome`] per request.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use trackanim_core::config::Settings;
//! use trackanim_core::orchestrator::{animate_tracks, AnimationOutcome};
//!
//! # async fn demo() {
//! let files = vec![PathBuf::from("files/a.gpx"), PathBuf::from("files/b.gpx")];
//! match animate_tracks(&Settings::default(), &files).await {
//!     AnimationOutcome::Success(video) => println!("{}", video.display()),
//!     AnimationOutcome::Error(message) => eprintln!("{}", message),
//! }
//! # }
//! ```

mod dispatch;
mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use uuid::Uuid;

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::render::{ProcessRenderer, Renderer};

pub use dispatch::dispatch;
pub use errors::{
    PipelineError, PipelineResult, StepError, StepResult, NO_INPUT_FILES_MESSAGE,
    NO_TRACK_FILES_MESSAGE,
};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{AlignTimeStep, ClassifyStep, MergeWaypointsStep};
pub use types::{AnimationOutcome, AnimationState, Context, StepOutcome};

/// Create the preparation pipeline: classify, merge waypoints, align.
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ClassifyStep::new())
        .with_step(MergeWaypointsStep::new())
        .with_step(AlignTimeStep::new())
}

/// Generate a run identifier: local timestamp plus a short random suffix.
pub fn new_run_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Local::now().format("%Y%m%d-%H%M%S"), &suffix[..8])
}

/// Render `files` with the renderer configured in `settings`.
///
/// Writes a run log under `paths.logs_folder` and the video under
/// `paths.work_dir`.
pub async fn animate_tracks(settings: &Settings, files: &[PathBuf]) -> AnimationOutcome {
    let run_id = new_run_id();

    let logger = match RunLogger::new(
        run_id.as_str(),
        &settings.paths.logs_folder,
        settings.logging.log_config(),
        None,
    ) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            let err =
                PipelineError::setup_failed(&run_id, format!("Cannot create run log: {}", e));
            tracing::error!("{}", err);
            return AnimationOutcome::Error(err.user_message());
        }
    };

    let renderer = match ProcessRenderer::from_settings(&settings.animator) {
        Ok(renderer) => renderer,
        Err(e) => {
            let err = StepError::from(e);
            logger.error(&err.to_string());
            return AnimationOutcome::Error(err.to_string());
        }
    };

    let ctx = Context::new(
        settings.clone(),
        run_id,
        PathBuf::from(&settings.paths.work_dir),
        logger,
    );
    animate_tracks_with(&ctx, &renderer, files).await
}

/// Run the full pipeline with a caller-supplied renderer.
pub async fn animate_tracks_with<R: Renderer>(
    ctx: &Context,
    renderer: &R,
    files: &[PathBuf],
) -> AnimationOutcome {
    ctx.logger.info(&format!(
        "Animating {} file(s) with {}",
        files.len(),
        renderer.name()
    ));

    let outcome = match run_animation(ctx, renderer, files).await {
        Ok(video) => AnimationOutcome::Success(video),
        Err(e) => {
            tracing::error!("{}", e);
            AnimationOutcome::Error(e.user_message())
        }
    };
    ctx.logger.flush();
    outcome
}

/// Run the pipeline and the renderer, keeping full error context.
pub async fn run_animation<R: Renderer>(
    ctx: &Context,
    renderer: &R,
    files: &[PathBuf],
) -> PipelineResult<PathBuf> {
    let mut state = AnimationState::new(files.to_vec());
    let result = create_standard_pipeline().run(ctx, &mut state)?;
    ctx.logger.debug(&format!(
        "Preparation finished: {} step(s) run, {} skipped",
        result.steps_completed.len(),
        result.steps_skipped.len()
    ));

    ctx.logger.phase("Render");
    dispatch(ctx, renderer, &state.active).await.map_err(|e| {
        ctx.logger.error(&format!("Render failed: {}", e));
        PipelineError::step_failed(&ctx.run_id, "Render", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpx::{parse_gpx_file, GpxDocument};
    use crate::render::{animator_args, RenderOutput, RenderResult};
    use crate::models::{ColoredTrack, ReferencePolicy};
    use crate::test_support::{
        hours_before, test_context, timed_segment, track_doc, waypoint_doc, write_doc,
    };
    use parking_lot::Mutex;
    use std::path::Path;
    use tempfile::tempdir;

    /// Records every invocation and optionally creates the destination.
    struct FakeRenderer {
        creates_output: bool,
        status: Option<i32>,
        stderr: &'static str,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRenderer {
        fn producing() -> Self {
            Self {
                creates_output: true,
                status: Some(0),
                stderr: "",
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(stderr: &'static str) -> Self {
            Self {
                creates_output: false,
                status: Some(0),
                stderr,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        fn last_args(&self) -> Vec<String> {
            self.calls.lock().last().cloned().unwrap_or_default()
        }
    }

    impl Renderer for FakeRenderer {
        fn name(&self) -> &str {
            "fake"
        }

        fn build_args(
            &self,
            inputs: &[ColoredTrack],
            destination: &Path,
        ) -> RenderResult<Vec<String>> {
            Ok(animator_args(&["fake-animator".to_string()], inputs, destination))
        }

        async fn invoke(&self, args: &[String]) -> RenderResult<RenderOutput> {
            self.calls.lock().push(args.to_vec());
            if self.creates_output {
                let at = args.iter().position(|a| a == "--output").unwrap();
                std::fs::write(&args[at + 1], b"video").unwrap();
            }
            Ok(RenderOutput {
                status: self.status,
                stdout: b"rendering frame 1\n".to_vec(),
                stderr: self.stderr.as_bytes().to_vec(),
            })
        }
    }

    fn colors(args: &[String]) -> Vec<String> {
        args.windows(2)
            .filter(|w| w[0] == "--color")
            .map(|w| w[1].clone())
            .collect()
    }

    fn inputs(args: &[String]) -> Vec<PathBuf> {
        args.windows(2)
            .filter(|w| w[0] == "--input")
            .map(|w| PathBuf::from(&w[1]))
            .collect()
    }

    fn recent_track(dir: &Path, name: &str) -> PathBuf {
        write_doc(
            dir,
            name,
            &track_doc(name, vec![timed_segment(&[hours_before(2), hours_before(1)])]),
        )
    }

    #[tokio::test]
    async fn empty_request_never_renders() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer::producing();

        let outcome = animate_tracks_with(&ctx, &renderer, &[]).await;
        assert_eq!(outcome, AnimationOutcome::Error("Треки не загружены!".to_string()));
        assert_eq!(renderer.call_count(), 0);
    }

    #[tokio::test]
    async fn files_without_tracks_never_render() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer::producing();
        let empty = write_doc(dir.path(), "empty", &GpxDocument::new());
        let pois = write_doc(dir.path(), "pois", &waypoint_doc(&["a", "b"]));

        let outcome = animate_tracks_with(&ctx, &renderer, &[empty.clone()]).await;
        assert_eq!(
            outcome,
            AnimationOutcome::Error("Нет файлов, содержащих треки!".to_string())
        );

        let outcome = animate_tracks_with(&ctx, &renderer, &[empty, pois]).await;
        assert_eq!(
            outcome,
            AnimationOutcome::Error("Нет файлов, содержащих треки!".to_string())
        );
        assert_eq!(renderer.call_count(), 0);
    }

    #[tokio::test]
    async fn renders_tracks_with_positional_colors() {
        crate::logging::init_test_tracing();
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer::producing();
        let pois = write_doc(dir.path(), "pois", &waypoint_doc(&["cafe"]));
        let a = recent_track(dir.path(), "a");
        let b = recent_track(dir.path(), "b");

        let outcome = animate_tracks_with(&ctx, &renderer, &[pois, a.clone(), b.clone()]).await;

        let video = outcome.video_path().unwrap();
        assert!(video.is_absolute());
        assert!(video.exists());
        assert_eq!(video.extension().unwrap(), "mp4");
        assert!(video.starts_with(std::path::absolute(dir.path().join("files")).unwrap()));

        let args = renderer.last_args();
        assert_eq!(args[0], "fake-animator");
        assert_eq!(args[1], "--output");
        assert_eq!(colors(&args), vec!["#1b5e20", "#880e4f"]);
        let rendered = inputs(&args);
        assert!(rendered.iter().all(|p| p.is_absolute()));
        assert!(rendered[0].ends_with("a.gpx"));
        assert!(rendered[1].ends_with("b.gpx"));

        assert_eq!(parse_gpx_file(&a).unwrap().waypoints.len(), 1);
        assert!(parse_gpx_file(&b).unwrap().waypoints.is_empty());
    }

    #[tokio::test]
    async fn reordering_reassigns_colors() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer::producing();
        let a = recent_track(dir.path(), "a");
        let b = recent_track(dir.path(), "b");

        animate_tracks_with(&ctx, &renderer, &[b, a]).await;

        let args = renderer.last_args();
        assert!(inputs(&args)[0].ends_with("b.gpx"));
        assert_eq!(colors(&args)[0], "#1b5e20");
    }

    #[tokio::test]
    async fn missing_video_reports_stderr() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer::failing("Exception: no points");
        let a = recent_track(dir.path(), "a");

        let outcome = animate_tracks_with(&ctx, &renderer, &[a]).await;
        assert_eq!(outcome, AnimationOutcome::Error("Exception: no points".to_string()));
        assert_eq!(renderer.call_count(), 1);
    }

    #[tokio::test]
    async fn silent_failure_reports_exit_status() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer {
            status: Some(3),
            ..FakeRenderer::failing("")
        };
        let a = recent_track(dir.path(), "a");

        let outcome = animate_tracks_with(&ctx, &renderer, &[a]).await;
        assert_eq!(
            outcome,
            AnimationOutcome::Error("fake produced no video (exit code 3)".to_string())
        );
    }

    #[tokio::test]
    async fn exit_code_does_not_decide_success() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer {
            status: Some(1),
            ..FakeRenderer::producing()
        };
        let a = recent_track(dir.path(), "a");

        let outcome = animate_tracks_with(&ctx, &renderer, &[a]).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn eleven_tracks_rejected_before_rendering() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer::producing();
        let files: Vec<PathBuf> = (0..11)
            .map(|i| recent_track(dir.path(), &format!("t{}", i)))
            .collect();

        let outcome = animate_tracks_with(&ctx, &renderer, &files).await;
        assert_eq!(
            outcome,
            AnimationOutcome::Error("Too many tracks: 11 (at most 10)".to_string())
        );
        assert_eq!(renderer.call_count(), 0);
    }

    #[tokio::test]
    async fn global_alignment_trims_before_rendering() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.alignment.reference = ReferencePolicy::Global;
        let ctx = test_context(dir.path(), settings);
        let renderer = FakeRenderer::producing();

        let a = write_doc(
            dir.path(),
            "a",
            &track_doc(
                "a",
                vec![
                    timed_segment(&[hours_before(6)]),
                    timed_segment(&[hours_before(1), hours_before(0)]),
                ],
            ),
        );
        let b = write_doc(
            dir.path(),
            "b",
            &track_doc(
                "b",
                vec![
                    timed_segment(&[hours_before(20), hours_before(19)]),
                    timed_segment(&[hours_before(3)]),
                ],
            ),
        );

        let outcome = animate_tracks_with(&ctx, &renderer, &[a.clone(), b.clone()]).await;
        assert!(outcome.is_success());

        let a_doc = parse_gpx_file(&a).unwrap();
        assert_eq!(a_doc.tracks[0].segments.len(), 1);
        assert_eq!(a_doc.latest_time(), Some(hours_before(0)));
        let b_doc = parse_gpx_file(&b).unwrap();
        assert_eq!(b_doc.tracks[0].segments.len(), 1);
        assert_eq!(b_doc.earliest_time(), Some(hours_before(3)));
    }

    #[tokio::test]
    async fn run_log_records_phases() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), Settings::default());
        let renderer = FakeRenderer::producing();
        let a = recent_track(dir.path(), "a");

        animate_tracks_with(&ctx, &renderer, &[a]).await;

        let log = std::fs::read_to_string(ctx.logger.log_path()).unwrap();
        assert!(log.contains("=== Classify GPX files ==="));
        assert!(log.contains("=== Render ==="));
        assert!(log.contains("fake exited with code 0"));
    }

    #[cfg(unix)]
    mod process {
        use super::*;

        fn shell_settings(dir: &Path, script: &str) -> Settings {
            let mut settings = Settings::default();
            settings.animator.executable = vec![
                "sh".to_string(),
                "-c".to_string(),
                script.to_string(),
                "sh".to_string(),
            ];
            settings.paths.work_dir = dir.join("files").to_string_lossy().into_owned();
            settings.paths.logs_folder = dir.join(".logs").to_string_lossy().into_owned();
            settings
        }

        #[tokio::test]
        async fn nonzero_exit_with_video_is_success() {
            let dir = tempdir().unwrap();
            let a = recent_track(dir.path(), "a");
            // $1 is --output, $2 the destination
            let settings = shell_settings(dir.path(), "touch \"$2\"; exit 1");

            let outcome = animate_tracks(&settings, &[a]).await;
            assert!(outcome.video_path().unwrap().exists());
        }

        #[tokio::test]
        async fn zero_exit_without_video_is_error() {
            let dir = tempdir().unwrap();
            let a = recent_track(dir.path(), "a");
            let settings = shell_settings(dir.path(), "echo 'render exploded' >&2; exit 0");

            let outcome = animate_tracks(&settings, &[a]).await;
            match outcome {
                AnimationOutcome::Error(message) => assert_eq!(message.trim(), "render exploded"),
                other => panic!("expected error, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn empty_executable_is_config_error() {
            let dir = tempdir().unwrap();
            let a = recent_track(dir.path(), "a");
            let mut settings = shell_settings(dir.path(), "");
            settings.animator.executable.clear();

            let outcome = animate_tracks(&settings, &[a]).await;
            assert!(matches!(outcome, AnimationOutcome::Error(ref m) if m.contains("executable")));
        }
    }
}
