//! Display utilities for the gamma CLI.
//!
//! Everything printed outside the interactive timer goes through here:
//! - Error messages
//! - The effective configuration
//! - The summary shown after the timer closes

use std::path::Path;

use crate::config::GammaConfig;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Shows the effective configuration and where it came from.
    pub fn show_config(config: &GammaConfig, path: &Path, exists: bool) {
        print!("{}", Self::format_config(config, path, exists));
    }

    /// Shows that a default configuration file was written.
    pub fn show_config_created(path: &Path) {
        println!("* Wrote default configuration to {}", path.display());
    }

    /// Shows the summary printed after the timer closes.
    pub fn show_exit_summary(completed_sessions: u32) {
        println!("{}", Self::format_exit_summary(completed_sessions));
    }

    fn format_config(config: &GammaConfig, path: &Path, exists: bool) -> String {
        let source = if exists { "" } else { " (not found, defaults)" };
        let presets = config
            .presets
            .iter()
            .enumerate()
            .map(|(i, minutes)| format!("[{}] {}m", i + 1, minutes))
            .collect::<Vec<_>>()
            .join("  ");

        format!(
            "gamma configuration\n\
             ─────────────────────────────\n\
             file:       {}{}\n\
             presets:    {}\n\
             volume:     {}%\n\
             ambient:    {}\n\
             frame rate: {} fps\n",
            path.display(),
            source,
            presets,
            config.volume_percent,
            if config.ambient { "on" } else { "off" },
            config.frame_rate,
        )
    }

    fn format_exit_summary(completed_sessions: u32) -> String {
        match completed_sessions {
            0 => "No sessions completed.".to_string(),
            1 => "1 session completed. Well done.".to_string(),
            n => format!("{} sessions completed. Well done.", n),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_config_defaults() {
            let out = Display::format_config(
                &GammaConfig::default(),
                Path::new("/tmp/gamma/config.json"),
                false,
            );

            assert!(out.contains("/tmp/gamma/config.json (not found, defaults)"));
            assert!(out.contains("[1] 5m  [2] 10m  [3] 15m  [4] 20m"));
            assert!(out.contains("volume:     70%"));
            assert!(out.contains("ambient:    on"));
            assert!(out.contains("frame rate: 30 fps"));
        }

        #[test]
        fn test_format_config_existing_file() {
            let config = GammaConfig {
                ambient: false,
                ..GammaConfig::default()
            };
            let out = Display::format_config(&config, Path::new("/tmp/c.json"), true);

            assert!(out.contains("file:       /tmp/c.json\n"));
            assert!(out.contains("ambient:    off"));
        }

        #[test]
        fn test_format_exit_summary() {
            assert_eq!(Display::format_exit_summary(0), "No sessions completed.");
            assert_eq!(
                Display::format_exit_summary(1),
                "1 session completed. Well done."
            );
            assert_eq!(
                Display::format_exit_summary(3),
                "3 sessions completed. Well done."
            );
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_show_functions_do_not_panic() {
            Display::show_error("Test error message");
            Display::show_config_created(Path::new("/tmp/x.json"));
            Display::show_exit_summary(2);
        }
    }
}
