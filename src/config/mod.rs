//! User configuration.
//!
//! Settings live in a JSON file at `<config dir>/gamma/config.json`. A
//! missing file means defaults; every field is optional.

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ambient::DEFAULT_FRAME_RATE;
use crate::types::{DEFAULT_PRESETS, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES};

/// Directory name under the platform config and cache directories.
pub const APP_DIR: &str = "gamma";

/// Presets map to keys `1`..`9`.
pub const MAX_PRESETS: usize = 9;

/// Highest accepted redraw rate.
pub const MAX_FRAME_RATE: u32 = 60;

fn default_presets() -> Vec<u32> {
    DEFAULT_PRESETS.to_vec()
}

fn default_volume_percent() -> u8 {
    70
}

fn default_ambient() -> bool {
    true
}

fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}

/// Persistent user settings.
///
/// # Example
///
/// ```
/// use gamma_tone::config::GammaConfig;
///
/// let config = GammaConfig::default();
/// assert_eq!(config.presets, vec![5, 10, 15, 20]);
/// assert_eq!(config.volume_percent, 70);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GammaConfig {
    /// Session lengths in minutes offered on keys `1`..`9`.
    #[serde(default = "default_presets")]
    pub presets: Vec<u32>,

    /// Initial tone volume (0-100).
    #[serde(default = "default_volume_percent")]
    pub volume_percent: u8,

    /// Whether the animated background is drawn.
    #[serde(default = "default_ambient")]
    pub ambient: bool,

    /// Background redraw rate in frames per second (1-60).
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
            volume_percent: default_volume_percent(),
            ambient: default_ambient(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl GammaConfig {
    /// Returns the default config file location.
    ///
    /// # Errors
    ///
    /// Returns `NoConfigDir` if the platform has no config directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Resolves an explicit path or falls back to the default location.
    ///
    /// # Errors
    ///
    /// See `default_path`.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Loads and validates the configuration at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds
    /// out-of-range values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Writes the configuration as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json + "\n").map_err(io_error)
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presets.is_empty() || self.presets.len() > MAX_PRESETS {
            return Err(ConfigError::Invalid(format!(
                "presets must have 1 to {} entries, got {}",
                MAX_PRESETS,
                self.presets.len()
            )));
        }

        if let Some(bad) = self
            .presets
            .iter()
            .find(|m| !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(m))
        {
            return Err(ConfigError::Invalid(format!(
                "preset {} is outside {}-{} minutes",
                bad, MIN_SESSION_MINUTES, MAX_SESSION_MINUTES
            )));
        }

        if self.volume_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "volume_percent must be 0-100, got {}",
                self.volume_percent
            )));
        }

        if !(1..=MAX_FRAME_RATE).contains(&self.frame_rate) {
            return Err(ConfigError::Invalid(format!(
                "frame_rate must be 1-{}, got {}",
                MAX_FRAME_RATE, self.frame_rate
            )));
        }

        Ok(())
    }

    /// Returns the preset bound to key `digit` (1-based).
    pub fn preset(&self, digit: u32) -> Option<u32> {
        let index = usize::try_from(digit.checked_sub(1)?).ok()?;
        self.presets.get(index).copied()
    }
}
