//! CLI module for gamma.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting outside the interactive timer

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
