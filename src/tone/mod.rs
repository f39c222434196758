//! Continuous tone playback for meditation sessions.
//!
//! This module provides the steady 40 Hz tone, including:
//!
//! - Lazy acquisition of the audio device on first start
//! - Pause/resume that keeps the oscillator alive
//! - Volume that persists across starts
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │    ToneEngine    │ ← state machine (stopped / running / paused)
//! └────────┬─────────┘
//!          │ ToneOutput
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ RodioToneOutput  │────▶│ Sink + SineWave  │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use gamma_tone::tone::{RodioToneOutput, ToneEngine};
//!
//! let mut engine = ToneEngine::new(RodioToneOutput::new());
//! engine.set_volume(0.5);
//! if let Err(e) = engine.start() {
//!     eprintln!("Tone unavailable: {}", e);
//! }
//! ```

mod engine;
mod error;
mod output;

use std::sync::{Arc, Mutex};

pub use engine::{ToneEngine, DEFAULT_VOLUME, TONE_FREQUENCY_HZ};
pub use error::ToneError;
pub use output::RodioToneOutput;

/// Trait for audio backends that can host a single oscillator.
///
/// Mirrors an audio graph of `oscillator -> gain -> device`: the device is
/// opened once, oscillators come and go, and the gain stage outlives them.
pub trait ToneOutput {
    /// Returns true once the device has been acquired.
    fn is_open(&self) -> bool;

    /// Acquires the audio device.
    ///
    /// # Errors
    ///
    /// Returns an error if no device can be opened.
    fn open(&mut self) -> Result<(), ToneError>;

    /// Creates the oscillator and starts emitting immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not open or refuses a new stream.
    fn start_oscillator(&mut self, frequency_hz: f32, gain: f32) -> Result<(), ToneError>;

    /// Destroys the oscillator. Silence is immediate.
    fn stop_oscillator(&mut self);

    /// Applies a new gain immediately.
    fn set_gain(&mut self, gain: f32);

    /// Suspends output without destroying the oscillator.
    fn suspend(&mut self);

    /// Resumes suspended output.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no oscillator to resume.
    fn resume(&mut self) -> Result<(), ToneError>;
}

// ============================================================================
// MockToneOutput
// ============================================================================

/// A call recorded by `MockToneOutput`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToneCall {
    Open,
    StartOscillator { frequency_hz: f32, gain: f32 },
    StopOscillator,
    SetGain(f32),
    Suspend,
    Resume,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<ToneCall>,
    open: bool,
    oscillator: bool,
    suspended: bool,
    gain: f32,
    fail_open: bool,
}

/// Mock tone output for testing.
///
/// Clones share state, so a test can keep a probe after handing the output
/// to an engine.
#[derive(Debug, Clone, Default)]
pub struct MockToneOutput {
    inner: Arc<Mutex<MockState>>,
}

impl MockToneOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `open` calls fail as if no device were present.
    pub fn set_fail_open(&self, fail: bool) {
        self.inner.lock().unwrap().fail_open = fail;
    }

    #[must_use]
    pub fn calls(&self) -> Vec<ToneCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    #[must_use]
    pub fn start_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| matches!(c, ToneCall::StartOscillator { .. }))
            .count()
    }

    /// Returns true if an oscillator exists, suspended or not.
    #[must_use]
    pub fn has_oscillator(&self) -> bool {
        self.inner.lock().unwrap().oscillator
    }

    /// Returns true if sound would currently be heard.
    #[must_use]
    pub fn is_emitting(&self) -> bool {
        let state = self.inner.lock().unwrap();
        state.oscillator && !state.suspended
    }

    #[must_use]
    pub fn gain(&self) -> f32 {
        self.inner.lock().unwrap().gain
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

impl ToneOutput for MockToneOutput {
    fn is_open(&self) -> bool {
        self.inner.lock().unwrap().open
    }

    fn open(&mut self) -> Result<(), ToneError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(ToneCall::Open);
        if state.fail_open {
            return Err(ToneError::DeviceNotAvailable("mock device".to_string()));
        }
        state.open = true;
        Ok(())
    }

    fn start_oscillator(&mut self, frequency_hz: f32, gain: f32) -> Result<(), ToneError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(ToneCall::StartOscillator { frequency_hz, gain });
        if !state.open {
            return Err(ToneError::NotOpen);
        }
        state.oscillator = true;
        state.suspended = false;
        state.gain = gain;
        Ok(())
    }

    fn stop_oscillator(&mut self) {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(ToneCall::StopOscillator);
        state.oscillator = false;
        state.suspended = false;
    }

    fn set_gain(&mut self, gain: f32) {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(ToneCall::SetGain(gain));
        state.gain = gain;
    }

    fn suspend(&mut self) {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(ToneCall::Suspend);
        if state.oscillator {
            state.suspended = true;
        }
    }

    fn resume(&mut self) -> Result<(), ToneError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(ToneCall::Resume);
        if !state.oscillator {
            return Err(ToneError::NotOpen);
        }
        state.suspended = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _: fn(RodioToneOutput) -> ToneEngine<RodioToneOutput> = ToneEngine::new;
        let _: fn() -> MockToneOutput = MockToneOutput::new;
        assert_eq!(TONE_FREQUENCY_HZ, 40.0);
        assert_eq!(DEFAULT_VOLUME, 0.7);
    }

    #[test]
    fn test_mock_clones_share_state() {
        let mut output = MockToneOutput::new();
        let probe = output.clone();

        output.open().unwrap();
        output.start_oscillator(40.0, 0.5).unwrap();

        assert!(probe.is_open());
        assert!(probe.is_emitting());
        assert_eq!(probe.gain(), 0.5);
    }

    #[test]
    fn test_mock_start_requires_open() {
        let mut output = MockToneOutput::new();
        assert_eq!(output.start_oscillator(40.0, 0.5), Err(ToneError::NotOpen));
    }

    #[test]
    fn test_mock_suspend_and_resume() {
        let mut output = MockToneOutput::new();
        output.open().unwrap();
        output.start_oscillator(40.0, 0.5).unwrap();

        output.suspend();
        assert!(output.has_oscillator());
        assert!(!output.is_emitting());

        output.resume().unwrap();
        assert!(output.is_emitting());
    }

    #[test]
    fn test_mock_clear_calls() {
        let mut output = MockToneOutput::new();
        output.set_gain(0.2);
        output.clear_calls();
        assert!(output.calls().is_empty());
    }
}
