//! gamma - 40Hz gamma meditation timer for the terminal
//!
//! Plays a continuous 40Hz tone for a chosen number of minutes:
//! - Preset or custom durations from 1 to 60 minutes
//! - Pause, resume and stop at any time
//! - Animated ambient background

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use tracing::warn;

use gamma_tone::ambient::AmbientRenderer;
use gamma_tone::cli::{Cli, Commands, Display, RunArgs};
use gamma_tone::config::{GammaConfig, APP_DIR};
use gamma_tone::session::{SessionClock, SessionController};
use gamma_tone::tone::{RodioToneOutput, ToneEngine};
use gamma_tone::ui::{self, App};

/// Viewport assumed when the terminal size cannot be queried.
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();
    let command = cli.command_or_default();

    // Initialize logging
    init_tracing(cli.verbose, &command);

    // Execute command
    if let Err(e) = execute(&cli, command).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// The interactive timer owns the terminal, so `run` logs to a file. Other
/// commands log to stderr.
fn init_tracing(verbose: bool, command: &Commands) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let Commands::Run(args) = command else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
        return;
    };

    match open_log_file(args) {
        Some(file) => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

/// Opens the log file for appending, creating its directory.
fn open_log_file(args: &RunArgs) -> Option<File> {
    let path = args.log_file.clone().or_else(default_log_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    File::options().create(true).append(true).open(path).ok()
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("gamma.log"))
}

/// Executes the CLI command.
async fn execute(cli: &Cli, command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run_timer(cli.config.as_deref(), args).await,
        Commands::Config { init } => show_config(cli.config.as_deref(), init),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

/// Opens the interactive timer.
async fn run_timer(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let config = match GammaConfig::resolve_path(config_path) {
        Ok(path) => GammaConfig::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        Err(e) => {
            warn!("{}, using defaults", e);
            GammaConfig::default()
        }
    };

    let volume = args.volume.unwrap_or(config.volume_percent);
    let ambient_enabled = config.ambient && !args.no_ambient;
    let (cols, rows) = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);

    let (clock_tx, clock_rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(
        ToneEngine::new(RodioToneOutput::new()),
        SessionClock::new(clock_tx),
        clock_rx,
        AmbientRenderer::new(cols, rows, config.frame_rate),
    );
    controller.set_volume_percent(volume);

    let mut app = App::new(controller, config.presets, ambient_enabled);
    if let Some(minutes) = args.minutes {
        app.start_session(minutes);
    }

    let completed = ui::run_interactive(&mut app).await?;
    Display::show_exit_summary(completed);
    Ok(())
}

/// Prints the effective configuration, writing defaults first with `--init`.
fn show_config(config_path: Option<&Path>, init: bool) -> Result<()> {
    let path = GammaConfig::resolve_path(config_path)?;

    if init && !path.exists() {
        GammaConfig::default().save(&path)?;
        Display::show_config_created(&path);
    }

    let config =
        GammaConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
    Display::show_config(&config, &path, path.exists());
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
