//! Terminal user interface.
//!
//! - `terminal`: raw mode / alternate screen guard
//! - `input`: key reader thread and key map
//! - `view`: ratatui rendering
//! - `app`: intent handling and the event loop

mod app;
mod input;
mod terminal;
mod view;

pub use app::{App, Flow, VOLUME_STEP};
pub use input::{map_key, InputReader, Intent, TermEvent};
pub use terminal::{restore_terminal, TerminalGuard};
pub use view::{draw, Screen};

use std::io;

use anyhow::{Context, Result};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::tone::ToneOutput;

/// Takes over the terminal and runs `app` until the user quits.
///
/// The terminal is restored on every exit path. Returns the number of
/// sessions completed.
///
/// # Errors
///
/// Returns an error if the terminal cannot be prepared or drawn to.
pub async fn run_interactive<O: ToneOutput>(app: &mut App<O>) -> Result<u32> {
    let mut stdout = io::stdout();
    let guard = TerminalGuard::enter(&mut stdout).context("failed to prepare terminal")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("failed to open terminal")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut reader = InputReader::spawn(tx);

    let result = app.run(&mut terminal, rx).await;

    reader.stop();
    drop(terminal);
    guard.restore();
    result
}
