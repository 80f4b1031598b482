//! trackanim core - turns GPX recordings into animated track videos.
//!
//! This crate holds the pipeline, GPX handling, configuration and storage
//! with no transport dependencies. The CLI and any chat front end build on
//! top of it.

pub mod cache;
pub mod config;
pub mod gpx;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod store;
pub mod tracks;

#[cfg(test)]
mod test_support;

pub use orchestrator::{animate_tracks, animate_tracks_with, AnimationOutcome};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
