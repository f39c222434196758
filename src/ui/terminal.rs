//! Terminal setup and teardown.
//!
//! The timer draws in raw mode on the alternate screen. Whatever happens,
//! including a panic inside the draw loop, the user's shell must get a sane
//! terminal back.

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use tracing::error;

static RAW_MODE_ENABLED: AtomicBool = AtomicBool::new(false);
static ALT_SCREEN_ENABLED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// RAII guard that restores the terminal on drop and on panic.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Switches to raw mode and the alternate screen with the cursor hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses either mode. Anything
    /// already enabled is undone when the returned error drops the guard.
    pub fn enter(stdout: &mut impl Write) -> io::Result<Self> {
        install_panic_hook();
        let guard = Self { _private: () };

        enable_raw_mode()?;
        RAW_MODE_ENABLED.store(true, Ordering::SeqCst);

        execute!(stdout, EnterAlternateScreen, Hide)?;
        ALT_SCREEN_ENABLED.store(true, Ordering::SeqCst);

        Ok(guard)
    }

    pub fn restore(&self) {
        restore_terminal();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Leaves raw mode and the alternate screen. Safe to call repeatedly.
pub fn restore_terminal() {
    if RAW_MODE_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = disable_raw_mode();
    }
    let mut stdout = io::stdout();
    if ALT_SCREEN_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
    let _ = execute!(stdout, Show);
    let _ = stdout.flush();
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            error!(%location, "panic: {}", info);
            previous(info);
        }));
    });
}
