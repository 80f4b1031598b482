//! Logging infrastructure for trackanim.
//!
//! This module provides:
//! - Global `tracing` subscriber setup
//! - Per-run loggers with file + callback output
//! - Tail buffer of renderer output for error diagnosis
//!
//! # Example
//!
//! ```no_run
//! use trackanim_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("run-42", ".logs", LogConfig::default(), None).unwrap();
//! logger.phase("Classify");
//! logger.command("gpx-animator --output files/out.mp4 ...");
//! logger.success("Animation ready");
//! ```

mod run_logger;
mod types;

pub use run_logger::RunLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
