//! Terminal output for the `koma` CLI.
//!
//! Styled output with automatic TTY detection that respects `NO_COLOR`.

use std::io::{self, IsTerminal};

/// ANSI styles used by the CLI.
#[derive(Debug, Clone, Copy)]
pub enum Style {
    Bold,
    Dim,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "1",
            Style::Dim => "2",
            Style::Red => "31",
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Blue => "34",
            Style::Magenta => "35",
            Style::Cyan => "36",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Console output handler with color support detection.
#[derive(Debug)]
pub struct Console {
    colors_enabled: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Colors are on unless `NO_COLOR` is set or stdout is not a terminal.
    pub fn new() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err() && io::stdout().is_terminal();

        Self { colors_enabled }
    }

    pub fn with_colors(enabled: bool) -> Self {
        Self {
            colors_enabled: enabled,
        }
    }

    /// Applies ANSI styles to text if colors are enabled.
    pub fn style(&self, text: &str, styles: &[Style]) -> String {
        if !self.colors_enabled || styles.is_empty() {
            return text.to_string();
        }

        let codes: Vec<&str> = styles.iter().map(|s| s.code()).collect();
        format!("\x1b[{}m{}{}", codes.join(";"), text, RESET)
    }

    /// Creates a bracketed label like `[INFO]`.
    pub fn label(&self, label: &str, color: Style) -> String {
        format!("[{}]", self.style(label, &[color, Style::Bold]))
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", self.label("INFO", Style::Blue), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", self.label("OK", Style::Green), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", self.label("WARN", Style::Yellow), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.label("ERROR", Style::Red), message);
    }

    /// Prints a section header in magenta bold.
    pub fn section(&self, message: &str) {
        println!();
        println!("{}", self.style(message, &[Style::Magenta, Style::Bold]));
    }

    /// Formats an episode badge such as `Episode 3`.
    pub fn episode(&self, label: &str) -> String {
        self.style(&format!("Episode {}", label), &[Style::Cyan, Style::Bold])
    }

    /// Prints one page line: `  3/12 url`, marking the current page.
    pub fn page(&self, index: usize, total: usize, url: &str, current: bool) {
        let position = format!("{:>3}/{}", index + 1, total);
        let marker = if current { ">" } else { " " };
        if current {
            println!("{} {} {}", marker, self.style(&position, &[Style::Bold]), url);
        } else {
            println!("{} {} {}", marker, self.style(&position, &[Style::Dim]), url);
        }
    }

    /// Formats a navigation hint that is either available or greyed out.
    pub fn nav(&self, text: &str, available: bool) -> String {
        if available {
            self.style(text, &[Style::Green])
        } else {
            self.style(text, &[Style::Dim])
        }
    }
}
