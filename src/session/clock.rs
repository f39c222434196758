//! Countdown clock for a meditation session.
//!
//! This module provides the session countdown:
//! - Whole-second ticks with tokio::time::interval
//! - Pause/resume where ticks during the pause are dropped, not banked
//! - Cancellation by dropping the interval
//! - Event firing for tick and completion observers

use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::trace;

use crate::types::{format_mmss, ClockState};

/// Period between clock ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// ClockEvent
// ============================================================================

/// Clock events delivered to the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockEvent {
    /// Countdown started
    Started {
        /// Length of the countdown
        total_seconds: u32,
    },
    /// One second elapsed while counting
    Tick {
        /// Remaining seconds after the decrement
        remaining_seconds: u32,
    },
    /// Countdown held
    Paused,
    /// Countdown continued
    Resumed,
    /// Countdown reached zero
    Completed,
    /// Countdown cancelled before reaching zero
    Stopped,
}

// ============================================================================
// SessionClock
// ============================================================================

/// Counts a session down in whole seconds.
#[derive(Debug)]
pub struct SessionClock {
    /// Current clock state
    state: ClockState,
    /// Repeating one-second timer, present while running
    ticker: Option<Interval>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<ClockEvent>,
}

impl SessionClock {
    /// Creates a stopped clock that reports to the given channel.
    pub fn new(event_tx: mpsc::UnboundedSender<ClockEvent>) -> Self {
        Self {
            state: ClockState::default(),
            ticker: None,
            event_tx,
        }
    }

    /// Starts counting down from `minutes`.
    ///
    /// The first tick fires one second after this call. Range checks are
    /// the caller's job; any positive value is accepted. Starting a running
    /// clock restarts it and cancels the previous timer.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&mut self, minutes: u32) {
        let total_seconds = minutes.saturating_mul(60);
        self.state = ClockState {
            total_seconds,
            remaining_seconds: total_seconds,
            running: true,
            paused: false,
        };

        let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some(ticker);

        self.emit(ClockEvent::Started { total_seconds });
    }

    /// Holds the countdown. Only acts while running and not paused.
    pub fn pause(&mut self) {
        if !self.state.running || self.state.paused {
            return;
        }

        self.state.paused = true;
        self.emit(ClockEvent::Paused);
    }

    /// Continues a held countdown.
    pub fn resume(&mut self) {
        if !self.state.paused {
            return;
        }

        self.state.paused = false;
        self.emit(ClockEvent::Resumed);
    }

    /// Cancels the countdown. Idempotent.
    pub fn stop(&mut self) {
        let was_running = self.state.running;
        self.reset();

        if was_running {
            self.emit(ClockEvent::Stopped);
        }
    }

    /// Handles one timer firing.
    ///
    /// Decrements only while counting. On reaching zero the completion event
    /// is emitted and the clock cleans up exactly like `stop`.
    ///
    /// Returns true if this tick completed the countdown.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_counting() {
            return false;
        }

        self.state.remaining_seconds -= 1;
        self.emit(ClockEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });

        if self.state.remaining_seconds > 0 {
            return false;
        }

        self.emit(ClockEvent::Completed);
        self.reset();
        true
    }

    /// Waits for the next timer firing.
    ///
    /// Never resolves while the clock is stopped. Cancel safe.
    pub async fn next_tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Returns the remaining time as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_mmss(self.state.remaining_seconds)
    }

    /// Returns a snapshot of the clock state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Returns true while the repeating timer is armed.
    pub fn is_armed(&self) -> bool {
        self.ticker.is_some()
    }

    fn reset(&mut self) {
        self.ticker = None;
        self.state.running = false;
        self.state.paused = false;
        self.state.remaining_seconds = 0;
    }

    fn emit(&self, event: ClockEvent) {
        if self.event_tx.send(event).is_err() {
            trace!("Clock event dropped: no listener");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
