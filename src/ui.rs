use console::{strip_ansi_codes, Term};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use printbay_protocol::PrintStatus;

/// Terminal output helpers
pub struct UI {
    term: Term,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    /// Print a success message (color only if supported)
    pub fn success(&self, message: &str) {
        let output = self.colorize(message, |m| m.green().bold().to_string());
        println!("{}", output);
    }

    /// Print an error message (color only if supported)
    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    /// Print a warning message (color only if supported)
    pub fn warning(&self, message: &str) {
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    /// Print an info message (color only if supported)
    pub fn info(&self, message: &str) {
        let output = self.colorize(message, |m| m.blue().bold().to_string());
        println!("{}", output);
    }

    /// Format a print status with its conventional color.
    pub fn format_status(&self, status: PrintStatus) -> String {
        let text = status.as_str();
        if !self.supports_color() {
            return text.to_string();
        }
        match status {
            PrintStatus::Completed => text.green().to_string(),
            PrintStatus::Failed => text.red().to_string(),
            PrintStatus::Aborted => text.yellow().to_string(),
            PrintStatus::Printing => text.cyan().to_string(),
        }
    }

    /// Format server connection status with appropriate color (if supported)
    pub fn format_server_status(&self, connected: bool) -> String {
        let text = if connected {
            "Connected"
        } else {
            "Connection failed"
        };
        if self.supports_color() {
            if connected {
                text.green().to_string()
            } else {
                text.red().to_string()
            }
        } else {
            text.to_string()
        }
    }

    /// Format an on/off plug state.
    pub fn format_plug_state(&self, on: bool) -> String {
        let text = if on { "on" } else { "off" };
        if self.supports_color() {
            if on {
                text.green().to_string()
            } else {
                text.dimmed().to_string()
            }
        } else {
            text.to_string()
        }
    }

    /// Print a blank line for spacing
    pub fn blank_line(&self) {
        println!();
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        let term_width = self.width();
        let title_len = title.len() + 4;
        let line_len = if term_width > title_len {
            (term_width - title_len) / 2
        } else {
            0
        };

        let line = "═".repeat(line_len);
        let supports_color = self.supports_color();

        println!();
        if supports_color {
            println!("{} {} {}", line.cyan(), title.cyan().bold(), line.cyan());
        } else {
            println!("{} {} {}", line, title, line);
        }
        println!();
    }

    /// Print a separator line
    pub fn separator(&self) {
        let width = self.width();
        let line = "─".repeat(width.min(80));
        if self.supports_color() {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }

    /// Create a card-style display for information
    pub fn card(&self, title: &str, content: Vec<(&str, String)>) {
        let term_width = self.width();
        let card_width = term_width.saturating_sub(4).clamp(50, 80);

        let supports_color = self.supports_color();

        println!("╭{}╮", "─".repeat(card_width - 2));
        let title_width = title.width();
        let title_spaces = card_width.saturating_sub(title_width + 4);
        if supports_color {
            println!("│ {} {}│", title.cyan().bold(), " ".repeat(title_spaces));
        } else {
            println!("│ {} {}│", title, " ".repeat(title_spaces));
        }
        println!("├{}┤", "─".repeat(card_width - 2));

        for (label, value) in content {
            // Strip ANSI codes for width calculations
            let label_plain = strip_ansi_codes(label);
            let value_plain = strip_ansi_codes(&value);

            let label_width = label_plain.width();
            let value_width = value_plain.width();
            let content_width = label_width + value_width + 4;

            let spaces = if content_width < card_width - 1 {
                card_width - content_width - 1
            } else {
                1
            };

            if supports_color {
                println!("│ {}: {}{}│", label.dimmed(), value, " ".repeat(spaces));
            } else {
                println!("│ {}: {}{}│", label, value, " ".repeat(spaces));
            }
        }

        println!("╰{}╯", "─".repeat(card_width - 2));
        println!();
    }

    /// Get terminal width for responsive layout
    pub fn width(&self) -> usize {
        self.term.size().1 as usize
    }

    /// Check if terminal supports color
    pub fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

/// Format bytes to human readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a duration in seconds as `3h 25m` / `12m 30s`.
pub fn format_duration(secs: i64) -> String {
    if secs < 0 {
        return "-".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Create a progress bar with modern styling
pub fn create_progress_bar(len: u64, message: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(len);
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{elapsed_precise:.dim}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  ")
    );
    pb.set_message(message.to_string());
    pb
}
