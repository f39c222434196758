//! Session controller error types.

use thiserror::Error;

/// Errors returned by session transitions.
///
/// Neither variant changes any state; both are meant to be shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Requested duration is not a whole number of minutes in 1-60.
    #[error("Please enter a duration between 1 and 60 minutes.")]
    InvalidDuration {
        /// The rejected input, as typed
        input: String,
    },

    /// A session is already running, paused, or finishing.
    #[error("A session is already in progress")]
    AlreadyActive,
}

impl SessionError {
    /// Returns true if the error was caused by user input.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidDuration { .. })
    }
}
