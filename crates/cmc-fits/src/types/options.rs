//! Writer options.

use chrono::{NaiveDateTime, Utc};

/// `DATE` keyword format (ISO 8601, UTC).
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Options for writing FITS files.
#[derive(Debug, Clone)]
pub struct FitsWriterOptions {
    /// Write a `DATE` card to the primary header (default: true).
    pub write_date: bool,
    /// File creation time; `None` uses the current UTC time.
    pub date: Option<NaiveDateTime>,
}

impl Default for FitsWriterOptions {
    fn default() -> Self {
        Self {
            write_date: true,
            date: None,
        }
    }
}

impl FitsWriterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed creation time.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self.write_date = true;
        self
    }

    /// Omit the `DATE` card.
    #[must_use]
    pub fn without_date(mut self) -> Self {
        self.write_date = false;
        self
    }

    /// Formatted `DATE` value, or `None` when disabled.
    #[must_use]
    pub fn format_date(&self) -> Option<String> {
        if !self.write_date {
            return None;
        }
        let date = self.date.unwrap_or_else(|| Utc::now().naive_utc());
        Some(date.format(DATE_FORMAT).to_string())
    }
}
