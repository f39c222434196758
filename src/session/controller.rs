//! Session controller: the single owner of session state.
//!
//! Translates user intents into lockstep calls on the tone engine and the
//! session clock, reacts to clock completion, and owns the ambient renderer
//! so that one `next_signal` future covers every engine timer.
//!
//! ```text
//!            ┌────────────────────┐
//!  intents ─▶│ SessionController  │◀─ ClockEvent (channel)
//!            └──┬───────┬──────┬──┘
//!               ▼       ▼      ▼
//!          ToneEngine  Clock  AmbientRenderer
//! ```

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::clock::{ClockEvent, SessionClock};
use super::error::SessionError;
use crate::ambient::AmbientRenderer;
use crate::tone::{ToneEngine, ToneOutput};
use crate::types::{SessionMinutes, SessionPhase, SessionState, SessionView};

/// How long the completion message stays up before returning to idle.
pub const COMPLETION_DELAY: Duration = Duration::from_secs(3);

// ============================================================================
// EngineSignal
// ============================================================================

/// A timer that fired and needs dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    /// The session clock's one-second timer
    ClockTick,
    /// The completion message has been shown long enough
    CompletionDue,
    /// The ambient renderer wants a new frame
    Frame,
}

// ============================================================================
// SessionController
// ============================================================================

/// Coordinates the tone engine, the session clock and the ambient renderer.
#[derive(Debug)]
pub struct SessionController<O: ToneOutput> {
    tone: ToneEngine<O>,
    clock: SessionClock,
    clock_events: mpsc::UnboundedReceiver<ClockEvent>,
    ambient: AmbientRenderer,
    state: SessionState,
    session_id: Option<Uuid>,
    completion_deadline: Option<Instant>,
    completion_delay: Duration,
}

impl<O: ToneOutput> SessionController<O> {
    /// Creates an idle controller around the given engines.
    ///
    /// `clock_events` must be the receiving end of the channel `clock`
    /// reports to. The tone volume is taken from the engine.
    pub fn new(
        tone: ToneEngine<O>,
        clock: SessionClock,
        clock_events: mpsc::UnboundedReceiver<ClockEvent>,
        ambient: AmbientRenderer,
    ) -> Self {
        let volume_percent = (tone.volume() * 100.0).round() as u8;
        Self {
            tone,
            clock,
            clock_events,
            ambient,
            state: SessionState::new(volume_percent),
            session_id: None,
            completion_deadline: None,
            completion_delay: COMPLETION_DELAY,
        }
    }

    /// Overrides how long the completion message stays up.
    #[must_use]
    pub fn with_completion_delay(mut self, delay: Duration) -> Self {
        self.completion_delay = delay;
        self
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    /// Starts a session of `minutes` (1-60).
    ///
    /// A tone that cannot reach the audio device is logged and the session
    /// continues silently.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` outside 1-60 and `AlreadyActive` unless idle.
    /// Neither changes any state.
    pub fn start_session(&mut self, minutes: u32) -> Result<(), SessionError> {
        let minutes = SessionMinutes::new(minutes)?;
        self.begin(minutes)
    }

    /// Starts a session from free-form custom duration input.
    ///
    /// # Errors
    ///
    /// See `start_session`.
    pub fn start_custom(&mut self, input: &str) -> Result<(), SessionError> {
        let minutes = SessionMinutes::parse(input)?;
        self.begin(minutes)
    }

    /// Pauses a playing session or resumes a paused one. No-op otherwise.
    pub fn toggle_play_pause(&mut self) {
        match self.state.phase {
            SessionPhase::Playing => {
                self.clock.pause();
                self.tone.pause();
                self.state.phase = SessionPhase::Paused;
                debug!(session = ?self.session_id, "Session paused");
            }
            SessionPhase::Paused => {
                self.clock.resume();
                if let Err(e) = self.tone.resume() {
                    warn!("Tone could not resume: {}", e);
                }
                self.state.phase = SessionPhase::Playing;
                debug!(session = ?self.session_id, "Session resumed");
            }
            SessionPhase::Idle | SessionPhase::Completing => {
                debug!(phase = self.state.phase.as_str(), "Ignoring play/pause");
            }
        }

        self.after_transition();
    }

    /// Ends the session and returns to idle. No-op while idle.
    ///
    /// During the completion message this skips the remaining delay.
    pub fn stop_session(&mut self) {
        if self.state.phase == SessionPhase::Idle {
            return;
        }

        if self.state.is_active() {
            info!(
                session = ?self.session_id,
                remaining = %self.clock.formatted_remaining(),
                "Session stopped"
            );
        }

        self.clock.stop();
        self.tone.stop();
        self.return_to_idle();
        self.after_transition();
    }

    /// Sets the volume from a 0-100 percentage. Values above 100 are capped.
    pub fn set_volume_percent(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.tone.set_volume(f32::from(percent) / 100.0);
        self.state.volume_percent = percent;
    }

    /// Stops everything, including the ambient loop, before exit.
    pub fn shutdown(&mut self) {
        self.stop_session();
        self.ambient.stop();
    }

    // ------------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------------

    /// Waits until one of the engine timers fires. Cancel safe.
    ///
    /// Never resolves while every timer is cancelled.
    pub async fn next_signal(&mut self) -> EngineSignal {
        let deadline = self.completion_deadline;

        tokio::select! {
            _ = self.clock.next_tick() => EngineSignal::ClockTick,
            _ = wait_for_deadline(deadline) => EngineSignal::CompletionDue,
            _ = self.ambient.next_frame() => EngineSignal::Frame,
        }
    }

    /// Processes a fired timer.
    pub fn dispatch(&mut self, signal: EngineSignal) {
        match signal {
            EngineSignal::ClockTick => {
                self.clock.tick();
                self.after_transition();
            }
            EngineSignal::CompletionDue => self.finish_completion(),
            EngineSignal::Frame => self.ambient.render_next(),
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns what the UI should show right now.
    pub fn view(&self) -> SessionView {
        SessionView {
            time_display: self.clock.formatted_remaining(),
            status: self.state.status_text(),
            phase: self.state.phase,
            playing: self.state.is_playing(),
            volume_percent: self.state.volume_percent,
            audible: !self.state.is_active() || self.tone.state().audible,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn tone(&self) -> &ToneEngine<O> {
        &self.tone
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn ambient(&self) -> &AmbientRenderer {
        &self.ambient
    }

    pub fn ambient_mut(&mut self) -> &mut AmbientRenderer {
        &mut self.ambient
    }

    /// Returns true when leaving now would abandon a session.
    pub fn has_session_in_progress(&self) -> bool {
        self.state.is_active()
    }

    /// Checks that the engines agree with the session phase.
    ///
    /// Tone and clock run exactly while a session is active, and the clock
    /// is held exactly while the session is paused.
    pub fn is_consistent(&self) -> bool {
        let active = self.state.is_active();
        let playing = self.state.is_playing();
        let tone = self.tone.state();
        let clock = self.clock.state();

        tone.running == active
            && tone.paused == (active && !playing)
            && clock.running == active
            && clock.paused == (active && !playing)
    }

    // ------------------------------------------------------------------------
    // Internal transitions
    // ------------------------------------------------------------------------

    fn begin(&mut self, minutes: SessionMinutes) -> Result<(), SessionError> {
        if self.state.phase != SessionPhase::Idle {
            return Err(SessionError::AlreadyActive);
        }

        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.state.duration_minutes = minutes.get();
        self.state.phase = SessionPhase::Playing;

        self.clock.start(minutes.get());
        if let Err(e) = self.tone.start() {
            warn!(session = %session_id, "Starting without sound: {} ({})", e, e.suggestion());
        }

        info!(session = %session_id, minutes = minutes.get(), "Session started");
        self.after_transition();
        Ok(())
    }

    /// Reacts to everything the clock reported since the last call.
    fn drain_clock_events(&mut self) {
        while let Ok(event) = self.clock_events.try_recv() {
            match event {
                ClockEvent::Completed => self.complete_session(),
                ClockEvent::Tick { remaining_seconds } if remaining_seconds % 60 == 0 => {
                    debug!(session = ?self.session_id, remaining_seconds, "Minute elapsed");
                }
                _ => {}
            }
        }
    }

    fn complete_session(&mut self) {
        if self.state.phase != SessionPhase::Playing {
            return;
        }

        self.tone.stop();
        self.state.phase = SessionPhase::Completing;
        self.state.completed_sessions += 1;
        self.completion_deadline = Some(Instant::now() + self.completion_delay);

        info!(
            session = ?self.session_id,
            minutes = self.state.duration_minutes,
            "Session complete"
        );
    }

    /// Leaves the completion message. The engines are already stopped.
    fn finish_completion(&mut self) {
        if self.state.phase != SessionPhase::Completing {
            return;
        }

        self.return_to_idle();
        self.after_transition();
    }

    fn return_to_idle(&mut self) {
        self.state.phase = SessionPhase::Idle;
        self.completion_deadline = None;
        self.session_id = None;
    }

    fn after_transition(&mut self) {
        self.drain_clock_events();
        debug_assert!(
            self.is_consistent(),
            "engines out of step with phase {:?}",
            self.state.phase
        );
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::MockToneOutput;

    fn create_controller() -> (SessionController<MockToneOutput>, MockToneOutput) {
        let output = MockToneOutput::new();
        let probe = output.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = SessionController::new(
            ToneEngine::new(output),
            SessionClock::new(tx),
            rx,
            AmbientRenderer::with_seed(20, 10, 30, 1),
        );
        (controller, probe)
    }

    /// Waits for and dispatches one clock tick, skipping other signals.
    async fn advance_one_tick(controller: &mut SessionController<MockToneOutput>) {
        loop {
            let signal = controller.next_signal().await;
            controller.dispatch(signal);
            if signal == EngineSignal::ClockTick {
                return;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Start Tests
    // ------------------------------------------------------------------------

    mod start_tests {
        use super::*;

        #[test]
        fn test_new_controller_is_idle() {
            let (controller, _probe) = create_controller();
            let view = controller.view();

            assert_eq!(view.phase, SessionPhase::Idle);
            assert_eq!(view.status, "Select duration to begin");
            assert_eq!(view.time_display, "00:00");
            assert!(!view.playing);
            assert_eq!(view.volume_percent, 70);
            assert!(controller.is_consistent());
        }

        #[tokio::test]
        async fn test_start_session() {
            let (mut controller, probe) = create_controller();

            controller.start_session(5).unwrap();

            let view = controller.view();
            assert_eq!(view.status, "5 minute session");
            assert_eq!(view.time_display, "05:00");
            assert!(view.playing);
            assert!(probe.is_emitting());
            assert!(controller.has_session_in_progress());
            assert!(controller.is_consistent());
        }

        #[tokio::test]
        async fn test_start_rejects_out_of_range() {
            let (mut controller, probe) = create_controller();

            for minutes in [0, 61, 1000] {
                let err = controller.start_session(minutes).unwrap_err();
                assert!(err.is_input_error());
            }

            assert_eq!(controller.state().phase, SessionPhase::Idle);
            assert!(probe.calls().is_empty());
        }

        #[tokio::test]
        async fn test_start_custom_input() {
            let (mut controller, _probe) = create_controller();

            assert!(controller.start_custom("0").is_err());
            assert!(controller.start_custom("61").is_err());
            assert_eq!(controller.state().phase, SessionPhase::Idle);

            controller.start_custom("30").unwrap();
            assert_eq!(controller.view().status, "30 minute session");
            assert_eq!(controller.view().time_display, "30:00");
        }

        #[tokio::test]
        async fn test_start_while_active_is_rejected() {
            let (mut controller, probe) = create_controller();
            controller.start_session(10).unwrap();

            let result = controller.start_session(5);

            assert_eq!(result, Err(SessionError::AlreadyActive));
            assert_eq!(controller.view().status, "10 minute session");
            assert_eq!(probe.start_count(), 1);
        }

        #[tokio::test]
        async fn test_start_without_audio_device() {
            let (mut controller, probe) = create_controller();
            probe.set_fail_open(true);

            controller.start_session(5).unwrap();

            assert_eq!(controller.state().phase, SessionPhase::Playing);
            assert!(!controller.view().audible);
            assert!(controller.is_consistent());
        }
    }

    // ------------------------------------------------------------------------
    // Pause / Stop Tests
    // ------------------------------------------------------------------------

    mod control_tests {
        use super::*;

        #[tokio::test]
        async fn test_toggle_pauses_and_resumes() {
            let (mut controller, probe) = create_controller();
            controller.start_session(10).unwrap();

            controller.toggle_play_pause();
            assert_eq!(controller.view().status, "Paused");
            assert!(!controller.view().playing);
            assert!(probe.has_oscillator());
            assert!(!probe.is_emitting());
            assert!(controller.is_consistent());

            controller.toggle_play_pause();
            assert_eq!(controller.view().status, "10 minute session");
            assert!(probe.is_emitting());
            assert!(controller.is_consistent());
        }

        #[test]
        fn test_toggle_when_idle_is_noop() {
            let (mut controller, probe) = create_controller();

            controller.toggle_play_pause();

            assert_eq!(controller.state().phase, SessionPhase::Idle);
            assert!(probe.calls().is_empty());
        }

        #[tokio::test]
        async fn test_stop_from_playing() {
            let (mut controller, probe) = create_controller();
            controller.start_session(5).unwrap();

            controller.stop_session();

            let view = controller.view();
            assert_eq!(view.status, "Select duration to begin");
            assert_eq!(view.time_display, "00:00");
            assert!(!probe.has_oscillator());
            assert!(!controller.clock().is_armed());
            assert!(controller.is_consistent());
        }

        #[tokio::test]
        async fn test_stop_from_paused() {
            let (mut controller, probe) = create_controller();
            controller.start_session(5).unwrap();
            controller.toggle_play_pause();

            controller.stop_session();

            assert_eq!(controller.state().phase, SessionPhase::Idle);
            assert!(!probe.has_oscillator());
            assert!(controller.is_consistent());
        }

        #[test]
        fn test_stop_when_idle_is_noop() {
            let (mut controller, probe) = create_controller();

            controller.stop_session();
            controller.stop_session();

            assert_eq!(controller.state().phase, SessionPhase::Idle);
            assert!(probe.calls().is_empty());
        }

        #[tokio::test]
        async fn test_new_session_after_stop() {
            let (mut controller, probe) = create_controller();
            controller.start_session(5).unwrap();
            controller.stop_session();

            controller.start_session(15).unwrap();

            assert_eq!(controller.view().time_display, "15:00");
            assert_eq!(probe.start_count(), 2);
        }
    }

    // ------------------------------------------------------------------------
    // Volume Tests
    // ------------------------------------------------------------------------

    mod volume_tests {
        use super::*;

        #[test]
        fn test_volume_while_idle_applies_to_next_start() {
            let (mut controller, probe) = create_controller();

            controller.set_volume_percent(40);

            assert_eq!(controller.view().volume_percent, 40);
            assert!((controller.tone().volume() - 0.4).abs() < 1e-6);
            assert!((probe.gain() - 0.4).abs() < 1e-6);
        }

        #[tokio::test]
        async fn test_volume_during_session() {
            let (mut controller, probe) = create_controller();
            controller.start_session(5).unwrap();

            controller.set_volume_percent(15);

            assert!((probe.gain() - 0.15).abs() < 1e-6);
        }

        #[test]
        fn test_volume_is_capped() {
            let (mut controller, _probe) = create_controller();

            controller.set_volume_percent(200);

            assert_eq!(controller.view().volume_percent, 100);
            assert_eq!(controller.tone().volume(), 1.0);
        }
    }

    // ------------------------------------------------------------------------
    // Timer-driven Tests (virtual time)
    // ------------------------------------------------------------------------

    mod timer_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_one_second_counts_down() {
            let (mut controller, _probe) = create_controller();
            controller.start_session(5).unwrap();

            advance_one_tick(&mut controller).await;

            assert_eq!(controller.view().time_display, "04:59");
        }

        #[tokio::test(start_paused = true)]
        async fn test_paused_session_holds_time() {
            let (mut controller, _probe) = create_controller();
            controller.start_session(10).unwrap();
            advance_one_tick(&mut controller).await;

            controller.toggle_play_pause();
            for _ in 0..5 {
                advance_one_tick(&mut controller).await;
            }
            assert_eq!(controller.view().time_display, "09:59");

            controller.toggle_play_pause();
            advance_one_tick(&mut controller).await;
            assert_eq!(controller.view().time_display, "09:58");
        }

        #[tokio::test(start_paused = true)]
        async fn test_natural_completion_returns_to_idle() {
            let (mut controller, probe) = create_controller();
            controller.start_session(1).unwrap();

            for _ in 0..60 {
                advance_one_tick(&mut controller).await;
            }

            let view = controller.view();
            assert_eq!(view.phase, SessionPhase::Completing);
            assert_eq!(view.status, "Session complete! 🎉");
            assert_eq!(view.time_display, "00:00");
            assert!(!view.playing);
            assert!(!probe.has_oscillator());
            assert!(controller.is_consistent());
            assert_eq!(controller.state().completed_sessions, 1);

            let completed_at = Instant::now();
            let signal = controller.next_signal().await;
            assert_eq!(signal, EngineSignal::CompletionDue);
            assert!(Instant::now() - completed_at >= COMPLETION_DELAY);
            controller.dispatch(signal);

            assert_eq!(controller.view().status, "Select duration to begin");
            assert_eq!(controller.state().phase, SessionPhase::Idle);
            assert!(controller.is_consistent());
        }

        #[tokio::test(start_paused = true)]
        async fn test_custom_completion_delay() {
            let (controller, _probe) = create_controller();
            let mut controller = controller.with_completion_delay(Duration::from_millis(500));
            controller.start_session(1).unwrap();
            for _ in 0..60 {
                advance_one_tick(&mut controller).await;
            }
            assert_eq!(controller.state().phase, SessionPhase::Completing);

            let completed_at = Instant::now();
            let signal = controller.next_signal().await;
            assert_eq!(signal, EngineSignal::CompletionDue);
            let waited = Instant::now() - completed_at;
            assert!(waited >= Duration::from_millis(500));
            assert!(waited < COMPLETION_DELAY);
            controller.dispatch(signal);

            assert_eq!(controller.state().phase, SessionPhase::Idle);
        }

        #[tokio::test(start_paused = true)]
        async fn test_toggle_during_completion_is_noop() {
            let (mut controller, _probe) = create_controller();
            controller.start_session(1).unwrap();
            for _ in 0..60 {
                advance_one_tick(&mut controller).await;
            }

            controller.toggle_play_pause();

            assert_eq!(controller.state().phase, SessionPhase::Completing);
        }

        #[tokio::test(start_paused = true)]
        async fn test_stop_during_completion_skips_delay() {
            let (mut controller, probe) = create_controller();
            controller.start_session(1).unwrap();
            for _ in 0..60 {
                advance_one_tick(&mut controller).await;
            }
            probe.clear_calls();

            controller.stop_session();

            assert_eq!(controller.state().phase, SessionPhase::Idle);
            assert!(probe.calls().is_empty(), "engines were already stopped");
        }

        #[tokio::test(start_paused = true)]
        async fn test_ambient_frames_do_not_touch_session() {
            let (mut controller, _probe) = create_controller();
            controller.ambient_mut().start();
            controller.start_session(5).unwrap();
            controller.toggle_play_pause();

            for _ in 0..10 {
                let signal = controller.next_signal().await;
                controller.dispatch(signal);
            }

            assert!(controller.ambient().frames_rendered() > 0);
            assert!(controller.ambient().is_running());
            assert_eq!(controller.state().phase, SessionPhase::Paused);
        }

        #[tokio::test(start_paused = true)]
        async fn test_shutdown_stops_everything() {
            let (mut controller, probe) = create_controller();
            controller.ambient_mut().start();
            controller.start_session(5).unwrap();

            controller.shutdown();

            assert!(!controller.ambient().is_running());
            assert!(!probe.has_oscillator());
            assert_eq!(controller.state().phase, SessionPhase::Idle);
        }
    }
}
