//! # Output Configuration
//!
//! Controls CLI output appearance based on terminal capabilities and user
//! preferences, and provides the small helpers used for reconciliation
//! progress lines.
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::fmt::Display;

use console::style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Behavior
    /// - `--color=always`: Force colors on (overrides NO_COLOR)
    /// - `--color=never`: Force colors off
    /// - `--color=auto`: Detect based on environment
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // Check NO_COLOR first (https://no-color.org/)
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        // Check CLICOLOR=0 disables colors
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        // Check CLICOLOR_FORCE=1 forces colors
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        // Check TERM=dumb
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Use console crate's detection for TTY and color support
        console::Term::stdout().features().colors_supported()
    }

    /// Push the decision into `console`'s global switch so every styled
    /// string in the crate honors it.
    pub fn apply(&self) {
        console::set_colors_enabled(self.use_color);
        console::set_colors_enabled_stderr(self.use_color);
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Print one reconciliation step line.
pub fn step(message: impl Display) {
    println!("\t{} {}", style("=>").green(), message);
}

/// Print one name/value detail line, as used by `status`.
pub fn detail(name: &str, value: impl Display) {
    println!("\t {}\t{}", name, value);
}

/// Last `max_lines` lines of a captured output blob, for error reports.
pub fn tail_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let skipped = lines.len().saturating_sub(max_lines);
    lines[skipped..].join("\n")
}
