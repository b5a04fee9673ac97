//! Configuration file loading and parsing
//!
//! Loads configuration from `~/.config/galleryview/config.toml`

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::{ChromeElement, DEFAULT_HEADER_ROWS};
use crate::error::{GalleryError, Result};
use crate::handler::action::DEFAULT_MAX_UPLOAD_BYTES;
use crate::scheduler::{SchedulerConfig, DEFAULT_CAPACITY, DEFAULT_KEEP};

/// Main configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Gallery server settings
    pub server: ServerConfig,
    /// Animation timing
    pub animation: AnimationConfig,
    /// UI display settings
    pub ui: UiConfig,
    /// Upload limits
    pub upload: UploadConfig,
}

/// Gallery server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the gallery server
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: crate::api::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Animation timing, all in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub inter_task_delay_ms: u64,
    pub frame_ms: u64,
    pub entrance_settle_ms: u64,
    pub arrival_fallback_ms: u64,
    pub arrival_pulse_ms: u64,
    pub remove_ms: u64,
    pub update_ms: u64,
    /// Queue length above which low-priority tasks are shed
    pub queue_capacity: usize,
    /// Leading tasks kept when shedding
    pub queue_keep: usize,
    pub duplicate_log_window_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            inter_task_delay_ms: 50,
            frame_ms: 16,
            entrance_settle_ms: 300,
            arrival_fallback_ms: 1500,
            arrival_pulse_ms: 500,
            remove_ms: 500,
            update_ms: 1000,
            queue_capacity: DEFAULT_CAPACITY,
            queue_keep: DEFAULT_KEEP,
            duplicate_log_window_ms: 2000,
        }
    }
}

impl AnimationConfig {
    /// Scheduler settings for these timings
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            inter_task_delay: Duration::from_millis(self.inter_task_delay_ms),
            frame: Duration::from_millis(self.frame_ms),
            entrance_settle: Duration::from_millis(self.entrance_settle_ms),
            arrival_fallback: Duration::from_millis(self.arrival_fallback_ms),
            arrival_pulse: Duration::from_millis(self.arrival_pulse_ms),
            remove: Duration::from_millis(self.remove_ms),
            update: Duration::from_millis(self.update_ms),
            capacity: self.queue_capacity,
            keep: self.queue_keep,
            duplicate_window: Duration::from_millis(self.duplicate_log_window_ms),
        }
    }
}

/// UI display settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Rows reserved for the mode header
    pub header_offset: u16,
    /// Floating controls shown in Normal mode
    pub floating_controls: Vec<ChromeElement>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            header_offset: DEFAULT_HEADER_ROWS,
            floating_controls: vec![
                ChromeElement::ThemeToggle,
                ChromeElement::MetadataToggle,
                ChromeElement::AddButton,
            ],
        }
    }
}

/// Upload limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    pub max_file_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ConfigFile {
    /// Get the config directory path (~/.config/galleryview)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("galleryview"))
    }

    /// Get the config file path (~/.config/galleryview/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| GalleryError::config(e.to_string()))
    }
}
