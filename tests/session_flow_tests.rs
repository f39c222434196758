//! End-to-end session flows driven through the public API.
//!
//! Each test wires a controller the way the binary does, with a mock tone
//! output, and runs on tokio's paused clock so minutes pass instantly:
//! - Preset start and first tick
//! - Pause and resume
//! - Custom duration validation
//! - Natural completion and return to idle
//! - Stop and restart

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use gamma_tone::ambient::AmbientRenderer;
use gamma_tone::session::{
    ClockEvent, EngineSignal, SessionClock, SessionController, SessionError, COMPLETION_DELAY,
};
use gamma_tone::tone::{MockToneOutput, ToneEngine};
use gamma_tone::types::SessionPhase;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_controller() -> (SessionController<MockToneOutput>, MockToneOutput) {
    let output = MockToneOutput::new();
    let probe = output.clone();
    let (tx, rx) = mpsc::unbounded_channel();
    let controller = SessionController::new(
        ToneEngine::new(output),
        SessionClock::new(tx),
        rx,
        AmbientRenderer::with_seed(60, 20, 30, 42),
    );
    (controller, probe)
}

/// Dispatches signals until `count` clock ticks have been handled.
async fn run_ticks(controller: &mut SessionController<MockToneOutput>, count: u32) {
    let mut ticks = 0;
    while ticks < count {
        let signal = controller.next_signal().await;
        controller.dispatch(signal);
        if signal == EngineSignal::ClockTick {
            ticks += 1;
        }
    }
}

// ============================================================================
// Flows
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_preset_session_counts_down() {
    let (mut controller, probe) = create_controller();

    controller.start_session(5).unwrap();
    assert_eq!(controller.view().status, "5 minute session");
    assert_eq!(controller.view().time_display, "05:00");
    assert!(controller.view().playing);
    assert!(probe.is_emitting());

    run_ticks(&mut controller, 1).await;
    assert_eq!(controller.view().time_display, "04:59");

    run_ticks(&mut controller, 59).await;
    assert_eq!(controller.view().time_display, "04:00");
    assert!(controller.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume_ten_minutes() {
    let (mut controller, probe) = create_controller();
    controller.start_session(10).unwrap();
    run_ticks(&mut controller, 30).await;
    assert_eq!(controller.view().time_display, "09:30");

    controller.toggle_play_pause();
    assert_eq!(controller.view().status, "Paused");
    assert!(!controller.view().playing);
    assert!(!probe.is_emitting());

    run_ticks(&mut controller, 120).await;
    assert_eq!(controller.view().time_display, "09:30");

    controller.toggle_play_pause();
    assert_eq!(controller.view().status, "10 minute session");
    assert!(probe.is_emitting());

    run_ticks(&mut controller, 1).await;
    assert_eq!(controller.view().time_display, "09:29");
}

#[tokio::test(start_paused = true)]
async fn test_custom_duration_validation() {
    let (mut controller, probe) = create_controller();

    for input in ["0", "61", "abc", ""] {
        let err = controller.start_custom(input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter a duration between 1 and 60 minutes."
        );
    }
    assert_eq!(controller.state().phase, SessionPhase::Idle);
    assert_eq!(probe.start_count(), 0);

    controller.start_custom("30").unwrap();
    assert_eq!(controller.view().status, "30 minute session");
    assert_eq!(controller.view().time_display, "30:00");
}

#[tokio::test(start_paused = true)]
async fn test_natural_completion_then_idle() {
    let (mut controller, probe) = create_controller();
    controller.start_session(1).unwrap();

    run_ticks(&mut controller, 60).await;

    let view = controller.view();
    assert_eq!(view.status, "Session complete! 🎉");
    assert_eq!(view.time_display, "00:00");
    assert!(!view.playing);
    assert!(!probe.has_oscillator());

    let completed_at = Instant::now();
    loop {
        let signal = controller.next_signal().await;
        controller.dispatch(signal);
        if signal == EngineSignal::CompletionDue {
            break;
        }
    }

    assert!(Instant::now() - completed_at >= COMPLETION_DELAY);
    assert_eq!(controller.view().status, "Select duration to begin");
    assert_eq!(controller.view().time_display, "00:00");
    assert_eq!(controller.state().completed_sessions, 1);
    assert!(controller.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_completion_with_ambient_running() {
    let (mut controller, _probe) = create_controller();
    controller.ambient_mut().start();
    controller.start_session(1).unwrap();

    run_ticks(&mut controller, 60).await;

    assert_eq!(controller.state().phase, SessionPhase::Completing);
    assert!(controller.ambient().frames_rendered() > 1000);
    assert!(controller.ambient().is_running());
}

#[tokio::test(start_paused = true)]
async fn test_stop_then_restart() {
    let (mut controller, probe) = create_controller();
    controller.start_session(20).unwrap();
    run_ticks(&mut controller, 5).await;

    controller.stop_session();
    assert_eq!(controller.view().time_display, "00:00");
    assert_eq!(controller.view().status, "Select duration to begin");
    assert!(!probe.has_oscillator());

    controller.start_session(15).unwrap();
    assert_eq!(controller.view().time_display, "15:00");
    assert_eq!(
        controller.start_session(5),
        Err(SessionError::AlreadyActive)
    );
}

#[tokio::test(start_paused = true)]
async fn test_silent_session_gets_sound_on_resume() {
    let (mut controller, probe) = create_controller();
    probe.set_fail_open(true);
    controller.start_session(5).unwrap();
    assert!(!controller.view().audible);

    probe.set_fail_open(false);
    controller.toggle_play_pause();
    controller.toggle_play_pause();

    assert!(controller.view().audible);
    assert!(probe.is_emitting());
}

// ============================================================================
// Clock in isolation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_clock_reports_lifecycle_events() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut clock = SessionClock::new(tx);

    clock.start(1);
    let start = Instant::now();
    while clock.state().running {
        clock.next_tick().await;
        clock.tick();
    }

    assert!(Instant::now() - start >= Duration::from_secs(60));

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.first(), Some(&ClockEvent::Started { total_seconds: 60 }));
    assert_eq!(events.last(), Some(&ClockEvent::Completed));
    assert_eq!(
        events.iter().filter(|e| matches!(e, ClockEvent::Tick { .. })).count(),
        60
    );
}
