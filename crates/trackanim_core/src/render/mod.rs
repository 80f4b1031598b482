//! Video rendering through an external animator.
//!
//! - `Renderer` trait: the seam between the pipeline and the program
//! - `ProcessRenderer`: spawns the configured executable with tokio
//! - Positional color palette

mod palette;
mod process;
mod renderer;
mod types;

pub use palette::{assign_colors, MAX_TRACKS, PALETTE};
pub use process::ProcessRenderer;
pub use renderer::{animator_args, Renderer};
pub use types::{RenderError, RenderOutput, RenderResult};
