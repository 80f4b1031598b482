//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};
use crate::models::{EmptyFilePolicy, ReferencePolicy, RewritePolicy, UntimedFilePolicy};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// External renderer invocation.
    #[serde(default)]
    pub animator: AnimatorSettings,

    /// Working directories and state files.
    #[serde(default)]
    pub paths: PathSettings,

    /// Temporal alignment policy.
    #[serde(default)]
    pub alignment: AlignmentSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Chat front-end settings (not used by the pipeline itself).
    #[serde(default)]
    pub bot: BotSettings,
}

/// How the external renderer is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimatorSettings {
    /// Argument vector prefix: program followed by its leading arguments.
    #[serde(default = "default_executable")]
    pub executable: Vec<String>,

    /// Extra fixed arguments inserted before `--output`.
    #[serde(default)]
    pub params: Vec<String>,
}

fn default_executable() -> Vec<String> {
    vec!["gpx-animator".to_string()]
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            params: Vec::new(),
        }
    }
}

/// Path configuration for downloads, rendered videos and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder holding downloaded track files and rendered videos.
    #[serde(default = "default_work_dir")]
    pub work_dir: String,

    /// Folder for per-run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// JSON file backing the per-chat track store.
    #[serde(default = "default_store_file")]
    pub store_file: String,
}

fn default_work_dir() -> String {
    "files".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

fn default_store_file() -> String {
    "tracks.json".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            logs_folder: default_logs_folder(),
            store_file: default_store_file(),
        }
    }
}

/// Temporal alignment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentSettings {
    /// Run the alignment stage at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Segments older than this (relative to the reference time) are dropped.
    #[serde(default = "default_recency_window_hours")]
    pub recency_window_hours: f64,

    /// Reference time selection.
    #[serde(default)]
    pub reference: ReferencePolicy,

    /// When trimmed files are written back.
    #[serde(default)]
    pub rewrite: RewritePolicy,

    /// Files trimmed down to nothing.
    #[serde(default)]
    pub empty_files: EmptyFilePolicy,

    /// Track files without any timestamp.
    #[serde(default)]
    pub untimed_files: UntimedFilePolicy,
}

fn default_true() -> bool {
    true
}

fn default_recency_window_hours() -> f64 {
    6.0
}

impl AlignmentSettings {
    /// The recency window as a duration. Negative values clamp to zero.
    pub fn recency_window(&self) -> Duration {
        Duration::try_from_secs_f64((self.recency_window_hours * 3600.0).max(0.0))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            recency_window_hours: default_recency_window_hours(),
            reference: ReferencePolicy::default(),
            rewrite: RewritePolicy::default(),
            empty_files: EmptyFilePolicy::default(),
            untimed_files: UntimedFilePolicy::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Copy renderer stdout/stderr into the run log.
    #[serde(default)]
    pub show_renderer_output: bool,

    /// Number of renderer output lines kept for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            show_renderer_output: false,
            error_tail: default_error_tail(),
        }
    }
}

impl LoggingSettings {
    /// Run logger configuration for these settings.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            show_renderer_output: self.show_renderer_output,
            error_tail: self.error_tail as usize,
            ..LogConfig::default()
        }
    }
}

/// Chat front-end configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotSettings {
    /// Bot API token.
    #[serde(default)]
    pub api_token: String,

    /// Public URL of the trimming editor.
    #[serde(default)]
    pub app_location: String,
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Animator,
    Paths,
    Alignment,
    Logging,
    Bot,
}

impl ConfigSection {
    /// All sections in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Animator,
        ConfigSection::Paths,
        ConfigSection::Alignment,
        ConfigSection::Logging,
        ConfigSection::Bot,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Animator => "animator",
            ConfigSection::Paths => "paths",
            ConfigSection::Alignment => "alignment",
            ConfigSection::Logging => "logging",
            ConfigSection::Bot => "bot",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Animator => "# External renderer command",
            ConfigSection::Paths => "# Working directories and state files",
            ConfigSection::Alignment => "# Trimming of multi-day recordings",
            ConfigSection::Logging => "# Logging configuration",
            ConfigSection::Bot => "# Chat front-end",
        }
    }
}
