//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or written.
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for this configuration.
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value is outside its allowed range.
    #[error("invalid config value: {0}")]
    Invalid(String),

    /// No platform configuration directory and no explicit path.
    #[error("no config directory on this platform; pass --config PATH")]
    NoConfigDir,
}

impl ConfigError {
    /// Returns true if the problem is in the file's contents rather than
    /// in accessing it.
    #[must_use]
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Invalid(_))
    }
}
