//! Tone engine error types.
//!
//! Every variant is recoverable: the session keeps running silently when
//! the audio device cannot be used.

use thiserror::Error;

/// Errors that can occur while driving the tone output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToneError {
    /// Audio device is not available (no output device, denied access).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create a playback stream on an open device.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// The output was used before a device was opened.
    #[error("audio output has not been opened")]
    NotOpen,
}

impl ToneError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device",
            Self::StreamError(_) => "check the system audio settings",
            Self::NotOpen => "restart the session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToneError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("audio device not available"));

        let err = ToneError::StreamError("busy".to_string());
        assert!(err.to_string().contains("busy"));

        assert_eq!(
            ToneError::NotOpen.to_string(),
            "audio output has not been opened"
        );
    }

    #[test]
    fn test_is_device_error() {
        assert!(ToneError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(ToneError::StreamError("x".into()).is_device_error());
        assert!(!ToneError::NotOpen.is_device_error());
    }

    #[test]
    fn test_suggestion() {
        assert!(ToneError::DeviceNotAvailable("x".into())
            .suggestion()
            .contains("audio output device"));
        assert!(ToneError::StreamError("x".into())
            .suggestion()
            .contains("audio settings"));
        assert!(ToneError::NotOpen.suggestion().contains("restart"));
    }
}
