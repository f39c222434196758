//! Tone engine: the logical state machine around a `ToneOutput`.
//!
//! The engine tracks stopped / running / paused itself and only forwards to
//! the output while it is audible. If the device cannot be acquired the
//! engine keeps following its state machine silently and retries attaching
//! the oscillator on the next resume.

use tracing::{debug, warn};

use super::error::ToneError;
use super::ToneOutput;
use crate::types::ToneState;

/// Frequency of the generated tone in Hz.
pub const TONE_FREQUENCY_HZ: f32 = 40.0;

/// Gain applied when nothing else has been requested.
pub const DEFAULT_VOLUME: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToneStatus {
    Stopped,
    Running,
    Paused,
}

/// Produces a continuous fixed-frequency tone with adjustable volume.
#[derive(Debug)]
pub struct ToneEngine<O: ToneOutput> {
    output: O,
    status: ToneStatus,
    volume: f32,
    audible: bool,
}

impl<O: ToneOutput> ToneEngine<O> {
    /// Creates a stopped engine. The output device is not touched until
    /// the first `start`.
    pub fn new(output: O) -> Self {
        Self {
            output,
            status: ToneStatus::Stopped,
            volume: DEFAULT_VOLUME,
            audible: false,
        }
    }

    /// Starts the tone. No-op if already running or paused.
    ///
    /// # Errors
    ///
    /// Returns a `ToneError` when the device or oscillator could not be
    /// created. The engine is still considered running (silently) and the
    /// caller may ignore the error.
    pub fn start(&mut self) -> Result<(), ToneError> {
        if self.status != ToneStatus::Stopped {
            return Ok(());
        }

        self.status = ToneStatus::Running;
        self.attach()
    }

    /// Stops the tone and releases the oscillator. No-op if stopped.
    pub fn stop(&mut self) {
        if self.status == ToneStatus::Stopped {
            return;
        }

        if self.audible {
            self.output.stop_oscillator();
        }
        self.status = ToneStatus::Stopped;
        self.audible = false;
        debug!("Tone stopped");
    }

    /// Suspends output while keeping the oscillator. Only acts while running.
    pub fn pause(&mut self) {
        if self.status != ToneStatus::Running {
            return;
        }

        if self.audible {
            self.output.suspend();
        }
        self.status = ToneStatus::Paused;
        debug!("Tone paused");
    }

    /// Resumes a paused tone. Only acts while paused.
    ///
    /// A tone that started silently gets another chance to reach the device
    /// here.
    ///
    /// # Errors
    ///
    /// Returns a `ToneError` if output could not be resumed; the engine is
    /// running (silently) regardless.
    pub fn resume(&mut self) -> Result<(), ToneError> {
        if self.status != ToneStatus::Paused {
            return Ok(());
        }

        self.status = ToneStatus::Running;
        debug!("Tone resumed");

        if self.audible {
            self.output.resume()
        } else {
            self.attach()
        }
    }

    /// Sets the volume, clamped to [0, 1]. Applies immediately and to any
    /// future start. Non-finite levels are ignored.
    pub fn set_volume(&mut self, level: f32) {
        if !level.is_finite() {
            warn!("Ignoring non-finite volume level");
            return;
        }

        self.volume = level.clamp(0.0, 1.0);
        self.output.set_gain(self.volume);
    }

    /// Returns the current volume in [0, 1].
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Returns a snapshot of the engine state.
    pub fn state(&self) -> ToneState {
        ToneState {
            running: self.status != ToneStatus::Stopped,
            paused: self.status == ToneStatus::Paused,
            volume: self.volume,
            audible: self.audible,
        }
    }

    /// Opens the device if needed and starts the oscillator.
    fn attach(&mut self) -> Result<(), ToneError> {
        let result = self.open_and_start();
        self.audible = result.is_ok();

        match &result {
            Ok(()) => debug!(frequency_hz = TONE_FREQUENCY_HZ, "Tone started"),
            Err(e) => warn!("Tone unavailable, continuing silently: {}", e),
        }

        result
    }

    fn open_and_start(&mut self) -> Result<(), ToneError> {
        if !self.output.is_open() {
            self.output.open()?;
        }
        self.output.start_oscillator(TONE_FREQUENCY_HZ, self.volume)
    }
}
