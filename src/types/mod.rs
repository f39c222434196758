//! Core data types for the gamma tone timer.
//!
//! This module defines the data structures used for:
//! - Session phase and state tracking
//! - Duration validation (1-60 minutes)
//! - Engine state snapshots (tone, clock)
//! - The view model the terminal UI renders

use serde::{Deserialize, Serialize};

use crate::session::SessionError;

// ============================================================================
// Constants
// ============================================================================

/// Shortest session that can be started, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 1;

/// Longest session that can be started, in minutes.
pub const MAX_SESSION_MINUTES: u32 = 60;

/// Preset durations offered by the duration selector.
pub const DEFAULT_PRESETS: [u32; 4] = [5, 10, 15, 20];

/// Status line shown while no session is active.
pub const STATUS_IDLE: &str = "Select duration to begin";

/// Status line shown while a session is paused.
pub const STATUS_PAUSED: &str = "Paused";

/// Status line shown after a session ran to completion.
pub const STATUS_COMPLETE: &str = "Session complete! 🎉";

// ============================================================================
// SessionPhase
// ============================================================================

/// Represents the current phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session; the duration selector is shown
    #[default]
    Idle,
    /// Session running, tone audible, clock counting down
    Playing,
    /// Session suspended, tone and clock held
    Paused,
    /// Clock reached zero; completion message is showing
    Completing,
}

impl SessionPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Playing => "playing",
            SessionPhase::Paused => "paused",
            SessionPhase::Completing => "completing",
        }
    }

    /// Returns true if a session is in progress (playing or paused).
    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::Playing | SessionPhase::Paused)
    }
}

// ============================================================================
// SessionMinutes
// ============================================================================

/// A session length that has been validated to lie within 1-60 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SessionMinutes(u32);

impl SessionMinutes {
    /// Validates a duration in minutes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` outside 1-60.
    pub fn new(minutes: u32) -> Result<Self, SessionError> {
        if (MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(SessionError::InvalidDuration {
                input: minutes.to_string(),
            })
        }
    }

    /// Parses free-form user input such as the custom duration field.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a whole
    /// number in range is rejected.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` carrying the raw input.
    pub fn parse(input: &str) -> Result<Self, SessionError> {
        let trimmed = input.trim();
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(|minutes| Self::new(minutes).ok())
            .ok_or_else(|| SessionError::InvalidDuration {
                input: trimmed.to_string(),
            })
    }

    /// Returns the duration in minutes.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Returns the duration in seconds.
    pub fn as_seconds(self) -> u32 {
        self.0 * 60
    }
}

impl TryFrom<u32> for SessionMinutes {
    type Error = SessionError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::new(minutes)
    }
}

impl From<SessionMinutes> for u32 {
    fn from(minutes: SessionMinutes) -> Self {
        minutes.0
    }
}

/// Formats a number of seconds as `MM:SS` with zero padding.
pub fn format_mmss(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Engine state snapshots
// ============================================================================

/// Snapshot of the tone engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneState {
    /// A generator exists (started and not yet stopped)
    pub running: bool,
    /// The generator exists but its output is suspended
    pub paused: bool,
    /// Gain level in [0, 1]
    pub volume: f32,
    /// False when the audio device could not be acquired
    pub audible: bool,
}

/// Snapshot of the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClockState {
    /// Length of the current countdown in seconds
    pub total_seconds: u32,
    /// Seconds left in the current countdown
    pub remaining_seconds: u32,
    /// A countdown is in progress
    pub running: bool,
    /// The countdown is held; ticks are dropped
    pub paused: bool,
}

impl ClockState {
    /// Returns true if the next tick would decrement the countdown.
    pub fn is_counting(&self) -> bool {
        self.running && !self.paused && self.remaining_seconds > 0
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Authoritative session state owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Current phase of the state machine
    pub phase: SessionPhase,
    /// Length of the current (or last) session in minutes
    pub duration_minutes: u32,
    /// Volume as shown to the user (0-100)
    pub volume_percent: u8,
    /// Sessions that ran to completion since launch
    pub completed_sessions: u32,
}

impl SessionState {
    /// Creates an idle session state with the given volume.
    pub fn new(volume_percent: u8) -> Self {
        Self {
            phase: SessionPhase::Idle,
            duration_minutes: 0,
            volume_percent: volume_percent.min(100),
            completed_sessions: 0,
        }
    }

    /// Returns true while a session is playing or paused.
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// Returns true while a session is active and not paused.
    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// Returns the human-readable status line for the current phase.
    pub fn status_text(&self) -> String {
        match self.phase {
            SessionPhase::Idle => STATUS_IDLE.to_string(),
            SessionPhase::Playing => format!("{} minute session", self.duration_minutes),
            SessionPhase::Paused => STATUS_PAUSED.to_string(),
            SessionPhase::Completing => STATUS_COMPLETE.to_string(),
        }
    }
}

// ============================================================================
// SessionView
// ============================================================================

/// Everything the UI layer needs to render the session panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Remaining time as `MM:SS`
    pub time_display: String,
    /// Status line
    pub status: String,
    /// Phase, for choosing which controls to show
    pub phase: SessionPhase,
    /// Play/pause icon state: true shows the pause icon
    pub playing: bool,
    /// Volume percentage (0-100)
    pub volume_percent: u8,
    /// False when the tone could not reach an audio device
    pub audible: bool,
}

// ============================================================================
// Tests
// ============================================================================
