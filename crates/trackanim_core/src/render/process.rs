//! Renderer backed by an external program.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::AnimatorSettings;
use crate::models::ColoredTrack;

use super::renderer::{animator_args, Renderer};
use super::types::{RenderError, RenderOutput, RenderResult};

/// Runs the configured animator executable as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    /// Program and any fixed leading arguments (e.g. `java -jar x.jar`).
    executable: Vec<String>,
    params: Vec<String>,
}

impl ProcessRenderer {
    pub fn new(executable: Vec<String>, params: Vec<String>) -> RenderResult<Self> {
        if executable.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(RenderError::InvalidConfig(
                "animator.executable is empty".to_string(),
            ));
        }
        Ok(Self { executable, params })
    }

    pub fn from_settings(settings: &AnimatorSettings) -> RenderResult<Self> {
        Self::new(settings.executable.clone(), settings.params.clone())
    }

    pub fn program(&self) -> &str {
        self.executable.first().map(String::as_str).unwrap_or_default()
    }
}

impl Renderer for ProcessRenderer {
    fn name(&self) -> &str {
        self.program()
    }

    fn build_args(&self, inputs: &[ColoredTrack], destination: &Path) -> RenderResult<Vec<String>> {
        let prefix: Vec<String> = self
            .executable
            .iter()
            .chain(self.params.iter())
            .cloned()
            .collect();
        Ok(animator_args(&prefix, inputs, destination))
    }

    async fn invoke(&self, args: &[String]) -> RenderResult<RenderOutput> {
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| RenderError::InvalidConfig("empty command line".to_string()))?;

        tracing::debug!("Spawning {} with {} argument(s)", program, rest.len());
        let output = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| RenderError::spawn(program.clone(), e))?;

        Ok(RenderOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
