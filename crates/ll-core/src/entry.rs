//! Log entry tokenizer.
//!
//! The agent writes entries as a bracketed header line optionally followed by
//! one free-text line:
//!
//! ```text
//! [10:00:00.123] [INF] BetterGenshinImpact.GameTask.AutoPick.AutoPickTrigger
//! 交互或拾取："Ore"
//! ```
//!
//! The tokenizer only splits text into entries. Timestamps stay raw here and
//! are validated by the segmenter, which owns the anomaly bookkeeping.

use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;

/// Header line: `[time] [level] category`, whitespace between parts optional.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s*\[([^\]]+)\]\s*(.*)$").expect("header regex is valid")
});

/// A leading `[Component] ` tag some categories carry before the message.
static COMPONENT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]*\]\s+").expect("component regex is valid"));

const BOM: char = '\u{feff}';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid log timestamp: {raw:?}")]
pub struct TimestampError {
    pub raw: String,
}

/// One tokenized log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Raw time-of-day text between the first pair of brackets.
    pub timestamp: String,
    pub level: String,
    pub category: String,
    /// The continuation line, empty when the entry had none.
    pub details: String,
}

impl LogEntry {
    /// Seconds since midnight, including the fractional part.
    pub fn seconds(&self) -> Result<f64, TimestampError> {
        parse_day_seconds(&self.timestamp)
    }

    /// Message lines the segmenter matches markers against.
    ///
    /// The category loses any leading `[Component] ` tag; an empty details
    /// line is not yielded.
    pub fn message_lines(&self) -> impl Iterator<Item = &str> {
        let category = COMPONENT_TAG_RE
            .find(&self.category)
            .map_or(self.category.as_str(), |m| &self.category[m.end()..]);
        std::iter::once(category.trim())
            .chain(std::iter::once(self.details.trim()))
            .filter(|line| !line.is_empty())
    }

    /// True when any message line contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.message_lines().any(|line| line.contains(needle))
    }
}

/// Parses `HH:MM:SS[.fff]` into fractional seconds since midnight.
pub fn parse_day_seconds(raw: &str) -> Result<f64, TimestampError> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S%.f").map_err(|_| TimestampError {
        raw: raw.to_string(),
    })?;
    Ok(f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9)
}

/// Splits one file's text into entries, in file order.
///
/// Lines that are neither a header nor the first continuation line after a
/// header are dropped.
pub fn tokenize(content: &str) -> Vec<LogEntry> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut entries = Vec::new();
    // Whether the last pushed entry may still take a details line.
    let mut open = false;

    for line in content.lines() {
        if let Some(caps) = HEADER_RE.captures(line) {
            entries.push(LogEntry {
                timestamp: caps[1].trim().to_string(),
                level: caps[2].trim().to_string(),
                category: caps[3].trim_end().to_string(),
                details: String::new(),
            });
            open = true;
            continue;
        }

        if open && !line.starts_with('[') {
            if let Some(entry) = entries.last_mut() {
                entry.details = line.trim_end().to_string();
            }
        }
        open = false;
    }

    entries
}
