//! Styled terminal output.
//!
//! Every command prints through [`Output`] so `--json` can switch the whole CLI to
//! machine-readable output in one place.

use std::fmt::Display;

use console::{Term, style};
use serde::Serialize;
use tabled::Table;
use tabled::settings::Style;

pub struct Output {
    term: Term,
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        if self.json {
            return;
        }
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X. Errors go to stderr.
    pub fn error(&self, message: impl Display) {
        drop(
            Term::stderr().write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn newline(&self) {
        if !self.json {
            drop(self.term.write_line(""));
        }
    }

    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    pub fn labeled(&self, label: impl Display, value: impl Display) {
        drop(
            self.term
                .write_line(&format!("  {}: {}", style(label).dim(), value)),
        );
    }

    pub fn dim(&self, message: impl Display) {
        if !self.json {
            drop(self.term.write_line(&style(message).dim().to_string()));
        }
    }

    /// Print `rows` as a rounded table.
    pub fn table<T: tabled::Tabled>(&self, rows: &[T]) {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        self.print(table);
    }

    pub fn total(&self, label: impl Display, count: u64, noun: &str) {
        drop(self.term.write_line(&format!(
            "\n{}: {}",
            style(label).bold(),
            style(format!("{count} {noun}(s)")).cyan()
        )));
    }

    /// Pretty-print `value` as JSON.
    pub fn json(&self, value: &impl Serialize) -> serde_json::Result<()> {
        let rendered = serde_json::to_string_pretty(value)?;
        self.print(rendered);
        Ok(())
    }
}
