//! The renderer seam.

use std::future::Future;
use std::path::Path;

use crate::models::ColoredTrack;

use super::types::{RenderOutput, RenderResult};

/// Something that turns colored GPX files into a video.
///
/// The dispatcher only needs three things: a name for logs, the full
/// argument vector for a given set of inputs, and a way to run it.
pub trait Renderer: Send + Sync {
    fn name(&self) -> &str;

    /// Full argument vector, program first.
    fn build_args(&self, inputs: &[ColoredTrack], destination: &Path) -> RenderResult<Vec<String>>;

    /// Run the renderer and wait for it to exit.
    fn invoke(&self, args: &[String]) -> impl Future<Output = RenderResult<RenderOutput>> + Send;
}

/// Build `prefix ++ ["--output", dest] ++ ["--input", path, "--color", hex]...`.
pub fn animator_args(prefix: &[String], inputs: &[ColoredTrack], destination: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(prefix.len() + 2 + inputs.len() * 4);
    args.extend(prefix.iter().cloned());
    args.push("--output".to_string());
    args.push(destination.to_string_lossy().into_owned());
    for input in inputs {
        args.push("--input".to_string());
        args.push(input.path.to_string_lossy().into_owned());
        args.push("--color".to_string());
        args.push(input.color.clone());
    }
    args
}
