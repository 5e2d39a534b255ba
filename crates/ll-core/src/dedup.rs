//! Pickup deduplication cache.

use std::collections::{HashMap, HashSet};

use crate::types::{DayKey, PickupKey};

/// Remembers which pickups have already been emitted.
///
/// Keys are partitioned by day so a day's keys can be dropped as a unit when
/// that day is ingested again: today's file on every read, and a past day
/// whenever the store no longer reports it as committed.
#[derive(Debug, Default)]
pub struct DedupCache {
    by_day: HashMap<DayKey, HashSet<PickupKey>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, key: &PickupKey) -> bool {
        self.by_day
            .get(&key.date)
            .is_some_and(|keys| keys.contains(key))
    }

    /// Records `key`, returning `true` if it was not already present.
    pub fn remember(&mut self, key: PickupKey) -> bool {
        self.by_day.entry(key.date.clone()).or_default().insert(key)
    }

    /// Drops every key recorded for `day`.
    pub fn forget_day(&mut self, day: &DayKey) {
        if let Some(keys) = self.by_day.remove(day) {
            tracing::trace!(%day, dropped = keys.len(), "cleared dedup keys");
        }
    }

    /// Total number of remembered keys.
    pub fn len(&self) -> usize {
        self.by_day.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
