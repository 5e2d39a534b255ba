//! Two-tier day storage.
//!
//! Past days live in a durable [`HistoryStore`] and are committed once.
//! The current day is never persisted: it is re-derived from its log file on
//! every read. [`Partition::of`] is the one rule deciding which tier a date
//! belongs to.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::types::{DayAggregate, DayKey, ItemPickupEvent};

/// Errors from the historical store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The current day only exists in the ephemeral tier.
    #[error("refusing to commit {0}: the current day is never persisted")]
    CurrentDay(DayKey),

    /// The persistence backend failed.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Which tier a date belongs to, relative to the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Historical,
    Today,
}

impl Partition {
    pub fn of(date: &DayKey, today: &DayKey) -> Self {
        if date == today {
            Self::Today
        } else {
            Self::Historical
        }
    }
}

/// Stored metadata for one committed day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayInfo {
    pub duration_seconds: i64,
    pub item_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// Row counts of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoreStats {
    pub days: usize,
    pub items: usize,
}

/// Durable persistence backend for committed days.
///
/// Implementations must make [`commit`](Self::commit) an overwrite: committing
/// a date twice leaves exactly the second aggregate.
pub trait HistoryStore {
    /// Dates that have been committed.
    fn stored_dates(&self) -> Result<BTreeSet<DayKey>, StoreError>;

    /// Writes `day`, replacing anything stored for the same date.
    fn commit(&mut self, day: &DayAggregate) -> Result<(), StoreError>;

    /// Duration per committed date.
    fn durations(&self) -> Result<BTreeMap<DayKey, i64>, StoreError>;

    /// Pickups per committed date, in commit order.
    fn items(&self) -> Result<BTreeMap<DayKey, Vec<ItemPickupEvent>>, StoreError>;

    fn day_info(&self, date: &DayKey) -> Result<Option<DayInfo>, StoreError>;

    fn stats(&self) -> Result<StoreStats, StoreError>;

    /// Deletes a committed date. Returns whether anything was removed.
    fn forget(&mut self, date: &DayKey) -> Result<bool, StoreError>;
}

/// In-memory [`HistoryStore`]. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    days: BTreeMap<DayKey, (DayAggregate, DateTime<Utc>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn stored_dates(&self) -> Result<BTreeSet<DayKey>, StoreError> {
        Ok(self.days.keys().cloned().collect())
    }

    fn commit(&mut self, day: &DayAggregate) -> Result<(), StoreError> {
        self.days.insert(day.date.clone(), (day.clone(), Utc::now()));
        Ok(())
    }

    fn durations(&self) -> Result<BTreeMap<DayKey, i64>, StoreError> {
        Ok(self
            .days
            .iter()
            .map(|(date, (day, _))| (date.clone(), day.duration_seconds))
            .collect())
    }

    fn items(&self) -> Result<BTreeMap<DayKey, Vec<ItemPickupEvent>>, StoreError> {
        Ok(self
            .days
            .iter()
            .map(|(date, (day, _))| (date.clone(), day.items.clone()))
            .collect())
    }

    fn day_info(&self, date: &DayKey) -> Result<Option<DayInfo>, StoreError> {
        Ok(self.days.get(date).map(|(day, updated_at)| DayInfo {
            duration_seconds: day.duration_seconds,
            item_count: day.items.len(),
            updated_at: *updated_at,
        }))
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        Ok(StoreStats {
            days: self.days.len(),
            items: self.days.values().map(|(day, _)| day.items.len()).sum(),
        })
    }

    fn forget(&mut self, date: &DayKey) -> Result<bool, StoreError> {
        Ok(self.days.remove(date).is_some())
    }
}

/// Historical tier over an injected backend.
///
/// Reads exclude `today` and commits of `today` are rejected, so the
/// historical tier can never shadow the ephemeral one.
#[derive(Debug)]
pub struct DayStore<S> {
    backend: S,
}

impl<S: HistoryStore> DayStore<S> {
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn stored_dates(&self) -> Result<BTreeSet<DayKey>, StoreError> {
        self.backend.stored_dates()
    }

    /// Commits a past day.
    pub fn commit(&mut self, day: &DayAggregate, today: &DayKey) -> Result<(), StoreError> {
        if Partition::of(&day.date, today) == Partition::Today {
            return Err(StoreError::CurrentDay(day.date.clone()));
        }
        self.backend.commit(day)?;
        tracing::info!(
            day = %day.date,
            items = day.items.len(),
            duration = day.duration_seconds,
            "committed day"
        );
        Ok(())
    }

    pub fn historical_duration(&self, today: &DayKey) -> Result<BTreeMap<DayKey, i64>, StoreError> {
        let mut durations = self.backend.durations()?;
        durations.remove(today);
        Ok(durations)
    }

    pub fn historical_items(
        &self,
        today: &DayKey,
    ) -> Result<BTreeMap<DayKey, Vec<ItemPickupEvent>>, StoreError> {
        let mut items = self.backend.items()?;
        items.remove(today);
        Ok(items)
    }

    /// Committed days other than `today`, joined from both reads.
    pub fn historical_days(&self, today: &DayKey) -> Result<Vec<DayAggregate>, StoreError> {
        let mut items = self.historical_items(today)?;
        Ok(self
            .historical_duration(today)?
            .into_iter()
            .map(|(date, duration_seconds)| DayAggregate {
                items: items.remove(&date).unwrap_or_default(),
                date,
                duration_seconds,
            })
            .collect())
    }

    pub fn day_info(&self, date: &DayKey) -> Result<Option<DayInfo>, StoreError> {
        self.backend.day_info(date)
    }

    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        self.backend.stats()
    }

    pub fn forget(&mut self, date: &DayKey) -> Result<bool, StoreError> {
        self.backend.forget(date)
    }
}
