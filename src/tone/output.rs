//! Tone output implementation using rodio.
//!
//! The device is opened lazily on the first start. A session's oscillator is
//! a `Sink` playing an endless `SineWave`; suspending pauses the sink, and
//! stopping drops it.

use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::error::ToneError;
use super::ToneOutput;

/// A tone output backed by the default rodio output device.
pub struct RodioToneOutput {
    /// The output stream and its handle (kept alive while open).
    stream: Option<(OutputStream, OutputStreamHandle)>,
    /// Sink carrying the oscillator, present while a tone exists.
    sink: Option<Sink>,
    /// Last gain applied; survives oscillator restarts.
    gain: f32,
}

impl RodioToneOutput {
    /// Creates an output that has not yet touched the audio device.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            gain: 0.0,
        }
    }
}

impl Default for RodioToneOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneOutput for RodioToneOutput {
    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn open(&mut self) -> Result<(), ToneError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let stream = OutputStream::try_default()
            .map_err(|e| ToneError::DeviceNotAvailable(e.to_string()))?;
        self.stream = Some(stream);

        debug!("Audio output stream initialized");
        Ok(())
    }

    fn start_oscillator(&mut self, frequency_hz: f32, gain: f32) -> Result<(), ToneError> {
        let (_, handle) = self.stream.as_ref().ok_or(ToneError::NotOpen)?;
        let sink = Sink::try_new(handle).map_err(|e| ToneError::StreamError(e.to_string()))?;

        self.gain = gain;
        sink.set_volume(gain);
        sink.append(SineWave::new(frequency_hz));
        sink.play();

        if let Some(previous) = self.sink.replace(sink) {
            previous.stop();
        }

        debug!(frequency_hz, gain, "Oscillator started");
        Ok(())
    }

    fn stop_oscillator(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("Oscillator stopped");
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(sink) = &self.sink {
            sink.set_volume(gain);
        }
    }

    fn suspend(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) -> Result<(), ToneError> {
        match &self.sink {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(ToneError::NotOpen),
        }
    }
}

impl std::fmt::Debug for RodioToneOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioToneOutput")
            .field("open", &self.stream.is_some())
            .field("oscillator", &self.sink.is_some())
            .field("gain", &self.gain)
            .finish_non_exhaustive()
    }
}
