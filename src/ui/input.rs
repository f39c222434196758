//! Keyboard input: a reader thread and the key map.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How often the reader thread checks whether it should exit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal events the UI cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the preset bound to this digit (1-9)
    Preset(u32),
    /// Open the custom duration prompt
    BeginCustom,
    /// Append a digit to the custom duration
    CustomDigit(char),
    CustomBackspace,
    CustomSubmit,
    CustomCancel,
    TogglePlay,
    Stop,
    VolumeUp,
    VolumeDown,
    ToggleInfo,
    Quit,
}

/// Maps a key press to an intent.
///
/// `custom_entry` is true while the custom duration prompt has focus; it
/// captures digits, Backspace, Enter and Esc. Volume keys keep working
/// there. Ctrl+C always quits.
pub fn map_key(key: KeyEvent, custom_entry: bool) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }

    if custom_entry {
        return match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => Some(Intent::CustomDigit(c)),
            KeyCode::Backspace => Some(Intent::CustomBackspace),
            KeyCode::Enter => Some(Intent::CustomSubmit),
            KeyCode::Esc => Some(Intent::CustomCancel),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Intent::VolumeUp),
            KeyCode::Char('-') => Some(Intent::VolumeDown),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(Intent::Preset),
        KeyCode::Char('c') => Some(Intent::BeginCustom),
        KeyCode::Char(' ') => Some(Intent::TogglePlay),
        KeyCode::Esc => Some(Intent::Stop),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Intent::VolumeUp),
        KeyCode::Char('-') => Some(Intent::VolumeDown),
        KeyCode::Char('i') => Some(Intent::ToggleInfo),
        KeyCode::Char('q') => Some(Intent::Quit),
        _ => None,
    }
}

/// Handle to the input reader thread. Stops the thread on drop.
#[derive(Debug)]
pub struct InputReader {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl InputReader {
    /// Spawns a thread forwarding key and resize events to `tx`.
    ///
    /// The thread exits when stopped, when the receiver is dropped, or when
    /// the terminal stops delivering events.
    pub fn spawn(tx: mpsc::UnboundedSender<TermEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::SeqCst) {
                match event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        warn!("Terminal input poll failed: {}", e);
                        break;
                    }
                }

                let forwarded = match event::read() {
                    Ok(Event::Key(key)) => TermEvent::Key(key),
                    Ok(Event::Resize(cols, rows)) => TermEvent::Resize(cols, rows),
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("Terminal input read failed: {}", e);
                        break;
                    }
                };

                if tx.send(forwarded).is_err() {
                    break;
                }
            }
            debug!("Input reader exited");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Asks the thread to exit and waits for it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}
