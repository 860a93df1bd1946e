// src/batch/report.rs
// =============================================================================
// Everything the user sees on the terminal goes through a Reporter.
//
// The driver calls the Reporter at each step (progress, success, failure,
// summary) and never prints anything itself. ConsoleReporter renders those
// steps as colored text; whether colors are used is decided once when the
// reporter is built, not through global state.
//
// Rust concepts:
// - Generic over io::Write: stdout in main(), a Vec<u8> in tests
// - colored: the .green(), .red() ... methods on strings
// =============================================================================

use super::RunSummary;
use crate::error::ConfigurationError;
use colored::{Color, Colorize};
use std::io::{self, Write};

// Longest URL prefix shown on a progress line
const MAX_URL_DISPLAY: usize = 80;

const RULE_WIDTH: usize = 60;

pub trait Reporter {
    fn banner(&mut self) -> io::Result<()>;
    fn credentials_loaded(&mut self) -> io::Result<()>;
    fn client_ready(&mut self) -> io::Result<()>;
    fn urls_loaded(&mut self, count: usize) -> io::Result<()>;
    fn starting(&mut self) -> io::Result<()>;
    fn progress(&mut self, index: usize, total: usize, url: &str) -> io::Result<()>;
    fn success(&mut self) -> io::Result<()>;
    fn failure(&mut self, message: &str) -> io::Result<()>;
    fn summary(&mut self, summary: &RunSummary) -> io::Result<()>;
    fn fatal(&mut self, error: &ConfigurationError) -> io::Result<()>;
}

pub struct ConsoleReporter<W> {
    out: W,
    color: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str, color: Color) -> io::Result<()> {
        let painted = self.paint(text, color);
        writeln!(self.out, "{}", painted)
    }

    fn rule(&mut self) -> io::Result<()> {
        self.line(&"=".repeat(RULE_WIDTH), Color::Blue)
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        self.line("Google Indexing API - Batch URL Indexing Request", Color::Blue)?;
        self.rule()?;
        writeln!(self.out)
    }

    fn credentials_loaded(&mut self) -> io::Result<()> {
        self.line("[OK] Credentials loaded successfully", Color::Green)
    }

    fn client_ready(&mut self) -> io::Result<()> {
        self.line("[OK] API service initialized", Color::Green)?;
        writeln!(self.out)
    }

    fn urls_loaded(&mut self, count: usize) -> io::Result<()> {
        self.line(&format!("Loaded {} URLs to index", count), Color::Blue)
    }

    fn starting(&mut self) -> io::Result<()> {
        self.line("Starting indexing requests...", Color::Blue)?;
        writeln!(self.out)
    }

    fn progress(&mut self, index: usize, total: usize, url: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "[{}/{}] Processing: {}...",
            index,
            total,
            truncate_url(url)
        )
    }

    fn success(&mut self) -> io::Result<()> {
        self.line("  [OK] Success", Color::Green)
    }

    fn failure(&mut self, message: &str) -> io::Result<()> {
        self.line(&format!("  [FAIL] {}", message), Color::Red)
    }

    fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        self.line("Summary", Color::Blue)?;
        self.rule()?;
        self.line(&format!("Successful: {}", summary.successful), Color::Green)?;
        self.line(&format!("Failed: {}", summary.failed), Color::Red)?;
        self.line(&format!("Total: {}", summary.total), Color::Blue)?;
        writeln!(self.out)?;

        // Only worth mentioning if something was actually submitted
        if summary.successful > 0 {
            self.line("Note: Indexing typically takes 24-48 hours", Color::Yellow)?;
            self.line("Check status in Google Search Console", Color::Yellow)?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn fatal(&mut self, error: &ConfigurationError) -> io::Result<()> {
        self.line(&format!("[ERROR] {}", error), Color::Red)?;
        if let Some(hint) = error.hint() {
            self.line(hint, Color::Yellow)?;
        }
        Ok(())
    }
}

// Shortens a URL to at most MAX_URL_DISPLAY characters.
// Counts chars, not bytes, so we never cut a multi-byte character in half.
fn truncate_url(url: &str) -> &str {
    match url.char_indices().nth(MAX_URL_DISPLAY) {
        Some((byte_index, _)) => &url[..byte_index],
        None => url,
    }
}
