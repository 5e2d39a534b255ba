//! Core type definitions with validation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for invalid day keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DayKeyError {
    /// The value is not eight ASCII digits.
    #[error("day key must be 8 digits (YYYYMMDD), got {value:?}")]
    Format { value: String },

    /// The digits do not form a calendar date.
    #[error("day key {value} is not a valid calendar date")]
    NotADate { value: String },
}

/// A calendar day in `YYYYMMDD` form.
///
/// This is the same encoding the log file names use, so string ordering is
/// chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(String);

impl DayKey {
    /// Creates a day key after validation.
    pub fn new(value: impl Into<String>) -> Result<Self, DayKeyError> {
        let value = value.into();
        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DayKeyError::Format { value });
        }
        if NaiveDate::parse_from_str(&value, "%Y%m%d").is_err() {
            return Err(DayKeyError::NotADate { value });
        }
        Ok(Self(value))
    }

    /// Builds the key for a calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y%m%d").to_string())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DayKey {
    type Error = DayKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DayKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single recognised item pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPickupEvent {
    pub item_name: String,
    /// Raw time-of-day text as it appeared in the log (e.g. `10:00:00.000`).
    pub timestamp: String,
    pub date: DayKey,
    /// Config group that was executing when the pickup happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_group: Option<String>,
}

impl ItemPickupEvent {
    /// Returns the dedup key for this event.
    #[must_use]
    pub fn key(&self) -> PickupKey {
        PickupKey {
            item_name: self.item_name.clone(),
            timestamp: self.timestamp.clone(),
            date: self.date.clone(),
            config_group: self.config_group.clone(),
        }
    }
}

/// Identity of a pickup for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PickupKey {
    pub item_name: String,
    pub timestamp: String,
    pub date: DayKey,
    pub config_group: Option<String>,
}

/// Per-day aggregate: the unit of storage and retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAggregate {
    pub date: DayKey,
    pub duration_seconds: i64,
    pub items: Vec<ItemPickupEvent>,
}

impl DayAggregate {
    /// A day is visible to callers only when it keeps at least one pickup.
    pub fn is_visible(&self) -> bool {
        !self.items.is_empty()
    }
}
