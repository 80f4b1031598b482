//! Configuration management for trackanim.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Defaults for every missing key
//!
//! # Example
//!
//! ```no_run
//! use trackanim_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new("config.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Renderer: {:?}", config.settings().animator.executable);
//!
//! config.settings_mut().alignment.recency_window_hours = 12.0;
//! config.update_section(ConfigSection::Alignment).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AlignmentSettings, AnimatorSettings, BotSettings, ConfigSection, LoggingSettings,
    PathSettings, Settings,
};
