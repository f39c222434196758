//! Interactive timer application.
//!
//! Turns key presses into controller calls, keeps the UI-only state (custom
//! duration prompt, notices, quit confirmation) and runs the event loop.

use anyhow::{Context, Result};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::input::{map_key, Intent, TermEvent};
use super::view::{self, Screen};
use crate::session::{EngineSignal, SessionController};
use crate::tone::ToneOutput;
use crate::types::SessionPhase;

/// Volume change per key press, in percent.
pub const VOLUME_STEP: u8 = 5;

/// Longest accepted custom duration input.
const MAX_CUSTOM_DIGITS: usize = 3;

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One iteration's worth of work for the event loop.
enum Step {
    Engine(EngineSignal),
    Term(TermEvent),
    InputClosed,
    Interrupt(std::io::Result<()>),
}

/// The interactive timer.
#[derive(Debug)]
pub struct App<O: ToneOutput> {
    controller: SessionController<O>,
    presets: Vec<u32>,
    ambient_enabled: bool,
    custom_input: Option<String>,
    notice: Option<String>,
    quit_armed: bool,
    show_info: bool,
}

impl<O: ToneOutput> App<O> {
    pub fn new(controller: SessionController<O>, presets: Vec<u32>, ambient_enabled: bool) -> Self {
        Self {
            controller,
            presets,
            ambient_enabled,
            custom_input: None,
            notice: None,
            quit_armed: false,
            show_info: false,
        }
    }

    pub fn controller(&self) -> &SessionController<O> {
        &self.controller
    }

    pub fn custom_input(&self) -> Option<&str> {
        self.custom_input.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns true after a first quit request during a session.
    pub fn is_quit_armed(&self) -> bool {
        self.quit_armed
    }

    pub fn is_info_shown(&self) -> bool {
        self.show_info
    }

    /// Starts a session of `minutes`, reporting failures as a notice.
    pub fn start_session(&mut self, minutes: u32) {
        if let Err(e) = self.controller.start_session(minutes) {
            self.notice = Some(e.to_string());
        }
    }

    /// Applies one intent.
    pub fn handle_intent(&mut self, intent: Intent) -> Flow {
        self.notice = None;
        if intent != Intent::Quit {
            self.quit_armed = false;
        }

        match intent {
            Intent::Quit => return self.request_quit(),
            Intent::Preset(digit) => {
                if self.controller.state().phase != SessionPhase::Idle {
                    return Flow::Continue;
                }
                let preset = usize::try_from(digit)
                    .ok()
                    .and_then(|d| d.checked_sub(1))
                    .and_then(|i| self.presets.get(i).copied());
                if let Some(minutes) = preset {
                    self.start_session(minutes);
                }
            }
            Intent::BeginCustom => {
                if self.controller.state().phase == SessionPhase::Idle {
                    self.custom_input = Some(String::new());
                }
            }
            Intent::CustomDigit(c) => {
                if let Some(input) = self.custom_input.as_mut() {
                    if input.len() < MAX_CUSTOM_DIGITS {
                        input.push(c);
                    }
                }
            }
            Intent::CustomBackspace => {
                if let Some(input) = self.custom_input.as_mut() {
                    input.pop();
                }
            }
            Intent::CustomSubmit => self.submit_custom(),
            Intent::CustomCancel => self.custom_input = None,
            Intent::TogglePlay => self.controller.toggle_play_pause(),
            Intent::Stop => {
                if self.controller.has_session_in_progress() {
                    self.controller.stop_session();
                }
            }
            Intent::VolumeUp => {
                let volume = self.controller.state().volume_percent;
                self.controller
                    .set_volume_percent(volume.saturating_add(VOLUME_STEP).min(100));
            }
            Intent::VolumeDown => {
                let volume = self.controller.state().volume_percent;
                self.controller
                    .set_volume_percent(volume.saturating_sub(VOLUME_STEP));
            }
            Intent::ToggleInfo => self.show_info = !self.show_info,
        }

        Flow::Continue
    }

    fn request_quit(&mut self) -> Flow {
        if self.controller.has_session_in_progress() && !self.quit_armed {
            self.quit_armed = true;
            debug!("Quit requested during session, waiting for confirmation");
            return Flow::Continue;
        }
        Flow::Quit
    }

    fn submit_custom(&mut self) {
        let Some(input) = self.custom_input.as_deref() else {
            return;
        };

        match self.controller.start_custom(input) {
            Ok(()) => self.custom_input = None,
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Applies a terminal event.
    pub fn handle_term_event(&mut self, event: TermEvent) -> Flow {
        match event {
            TermEvent::Key(key) => match map_key(key, self.custom_input.is_some()) {
                Some(intent) => self.handle_intent(intent),
                None => Flow::Continue,
            },
            TermEvent::Resize(cols, rows) => {
                self.controller.ambient_mut().resize(cols, rows);
                Flow::Continue
            }
        }
    }

    /// Runs until the user quits. Returns the number of completed sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be drawn to.
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut events: mpsc::UnboundedReceiver<TermEvent>,
    ) -> Result<u32> {
        if self.ambient_enabled {
            let size = terminal.size().context("failed to query terminal size")?;
            self.controller.ambient_mut().resize(size.width, size.height);
            self.controller.ambient_mut().start();
        }

        let mut sigint = Box::pin(tokio::signal::ctrl_c());

        loop {
            self.draw(terminal)?;

            let step = tokio::select! {
                signal = self.controller.next_signal() => Step::Engine(signal),
                event = events.recv() => match event {
                    Some(event) => Step::Term(event),
                    None => Step::InputClosed,
                },
                result = &mut sigint => Step::Interrupt(result),
            };

            let flow = match step {
                Step::Engine(signal) => {
                    self.controller.dispatch(signal);
                    Flow::Continue
                }
                Step::Term(event) => self.handle_term_event(event),
                Step::InputClosed => {
                    warn!("Terminal input closed, exiting");
                    Flow::Quit
                }
                Step::Interrupt(result) => {
                    sigint = Box::pin(tokio::signal::ctrl_c());
                    match result {
                        Ok(()) => self.handle_intent(Intent::Quit),
                        Err(e) => {
                            warn!("Failed to listen for SIGINT: {}", e);
                            Flow::Continue
                        }
                    }
                }
            };

            if !self.controller.has_session_in_progress() {
                self.quit_armed = false;
            }

            if flow == Flow::Quit {
                break;
            }
        }

        self.controller.shutdown();
        let completed = self.controller.state().completed_sessions;
        info!(completed, "Timer closed");
        Ok(completed)
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        let session = self.controller.view();
        let screen = Screen {
            session: &session,
            presets: &self.presets,
            custom_input: self.custom_input.as_deref(),
            notice: self.notice.as_deref(),
            quit_armed: self.quit_armed,
            show_info: self.show_info,
            ambient: self
                .ambient_enabled
                .then(|| self.controller.ambient().surface()),
        };

        terminal
            .draw(|frame| view::draw(frame, &screen))
            .context("failed to draw")?;
        Ok(())
    }
}
