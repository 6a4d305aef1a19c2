//! Terminal output utilities for styled CLI output.
//!
//! [`Output`] doubles as the user list's [`Notifier`], so controller
//! notifications land on the terminal next to command output.

use std::fmt::Display;

use console::{Term, style};
use tube_admin_business::users::Notifier;

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Output helper writing to stderr, for messages that must not mix with
    /// piped command output.
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    pub fn divider(&self, width: usize) {
        drop(
            self.term
                .write_line(&style("─".repeat(width)).dim().to_string()),
        );
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        drop(
            self.term
                .write_line(&format!("{spaces}{}: {}", style(label).dim(), value)),
        );
    }

    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print the "showing a-b of n" line under a page of results.
    pub fn page_summary(&self, start: u64, shown: usize, total: u64) {
        let first = if shown == 0 { start } else { start + 1 };
        let last = start + shown as u64;
        drop(self.term.write_line(&format!(
            "\n{} {}-{} of {}",
            style("Showing").dim(),
            style(first).cyan(),
            style(last).cyan(),
            style(total).cyan().bold()
        )));
    }
}

impl Notifier for Output {
    fn success(&self, message: &str) {
        Self::success(self, message);
    }

    fn error(&self, message: &str) {
        Self::error(self, message);
    }
}
