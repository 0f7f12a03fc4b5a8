// src/report/theme.rs
// =============================================================================
// Color theme for the human-readable output.
//
// The theme is chosen ONCE at startup (from --no-color) and then handed to
// whoever prints. A disabled theme never calls into `colored`, so it stays
// plain whatever the terminal looks like.
//
// `colored` on its own drops escape codes when stdout isn't a terminal;
// install() tells it once, at startup, to honour an enabled theme anyway.
// =============================================================================

use colored::{Color, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    enabled: bool,
}

impl Theme {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Makes `colored` emit escape codes for an enabled theme even when
    /// output is piped. Call once, before anything is printed.
    pub fn install(&self) {
        if self.enabled {
            colored::control::set_override(true);
        }
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(text, Color::BrightRed, false)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(text, Color::BrightGreen, false)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, Color::BrightYellow, false)
    }

    pub fn blue(&self, text: &str) -> String {
        self.paint(text, Color::BrightBlue, false)
    }

    pub fn bold_yellow(&self, text: &str) -> String {
        self.paint(text, Color::BrightYellow, true)
    }

    pub fn bold(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let painted = text.color(color);
        if bold {
            painted.bold().to_string()
        } else {
            painted.to_string()
        }
    }
}
