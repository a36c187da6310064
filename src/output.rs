//! # Output Configuration
//!
//! Controls how the CLI decorates what it prints. Status lines start with a
//! short marker that is colored on a capable terminal and plain text
//! otherwise, so output stays readable in logs and pipes.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

use console::style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether markers should be colored.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` and `never` win over the environment; anything else detects
    /// support from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Render the marker for a status line.
    pub fn marker(&self, status: Status) -> String {
        let text = status.text();
        if !self.use_color {
            return text.to_string();
        }
        let styled = style(text).force_styling(true);
        match status {
            Status::Ok => styled.green().bold().to_string(),
            Status::Info => styled.cyan().to_string(),
            Status::Warn => styled.yellow().bold().to_string(),
            Status::DryRun => styled.magenta().to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kind of status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Info,
    Warn,
    DryRun,
}

impl Status {
    fn text(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Info => "[INFO]",
            Status::Warn => "[WARN]",
            Status::DryRun => "[DRY-RUN]",
        }
    }
}
