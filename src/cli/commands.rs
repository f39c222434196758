//! Command definitions for the gamma CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// gamma - 40Hz gamma meditation timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "gamma",
    version,
    about = "40Hz gamma meditation timer",
    long_about = "Plays a continuous 40Hz tone for a timed meditation session \
                  over an animated ambient background.\n\
                  Running without a subcommand opens the timer.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the config file (default: <config dir>/gamma/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the command to run, opening the timer when none was given.
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the meditation timer
    Run(RunArgs),

    /// Show the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Start a session of this many minutes right away (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub minutes: Option<u32>,

    /// Initial volume in percent (0-100), overrides the config file
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub volume: Option<u8>,

    /// Disable the animated background
    #[arg(long)]
    pub no_ambient: bool,

    /// Write logs to this file (default: <cache dir>/gamma/gamma.log)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Tests
// ============================================================================
