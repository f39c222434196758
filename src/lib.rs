//! 40Hz gamma meditation timer.
//!
//! This library provides the core functionality for the `gamma` CLI.
//! It includes:
//! - Tone engine producing a continuous 40Hz sine tone
//! - Session clock counting down whole seconds with pause/resume
//! - Session controller keeping tone, clock and display in step
//! - Ambient renderer drawing the animated background
//! - Terminal UI, CLI parsing and user configuration

pub mod ambient;
pub mod cli;
pub mod config;
pub mod session;
pub mod tone;
pub mod types;
pub mod ui;

// Re-export commonly used types for convenience
pub use types::{
    format_mmss, ClockState, SessionMinutes, SessionPhase, SessionState, SessionView, ToneState,
};

pub use ambient::AmbientRenderer;
pub use config::{ConfigError, GammaConfig};
pub use session::{ClockEvent, EngineSignal, SessionClock, SessionController, SessionError};
pub use tone::{MockToneOutput, RodioToneOutput, ToneEngine, ToneError, ToneOutput};
