//! Read-only summaries over merged day aggregates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{DayAggregate, DayKey};

/// Totals across a set of days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_duration_seconds: i64,
    pub item_counts: BTreeMap<String, usize>,
}

impl Summary {
    /// Human-readable total duration.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.total_duration_seconds)
    }
}

/// Formats seconds as `<h>小时<m>分钟`, dropping zero parts.
///
/// Anything under a minute (including negative input) is `0分钟`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}小时"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}分钟"));
    }
    if out.is_empty() {
        out.push_str("0分钟");
    }
    out
}

/// Sums durations and counts pickups by name.
pub fn summarize<'a>(days: impl IntoIterator<Item = &'a DayAggregate>) -> Summary {
    let mut summary = Summary::default();
    for day in days {
        summary.total_duration_seconds += day.duration_seconds;
        for item in &day.items {
            *summary
                .item_counts
                .entry(item.item_name.clone())
                .or_insert(0) += 1;
        }
    }
    summary
}

/// Summary of a single date; empty when the date is absent.
pub fn summarize_day(days: &[DayAggregate], date: &DayKey) -> Summary {
    summarize(days.iter().filter(|day| &day.date == date))
}

/// How many times `item_name` was picked up on each date it appears.
pub fn item_history(days: &[DayAggregate], item_name: &str) -> BTreeMap<DayKey, usize> {
    let mut history = BTreeMap::new();
    for day in days {
        let count = day
            .items
            .iter()
            .filter(|item| item.item_name == item_name)
            .count();
        if count > 0 {
            *history.entry(day.date.clone()).or_insert(0) += count;
        }
    }
    history
}

/// Whole minutes of activity per date.
pub fn duration_history(days: &[DayAggregate]) -> BTreeMap<DayKey, i64> {
    days.iter()
        .map(|day| (day.date.clone(), day.duration_seconds / 60))
        .collect()
}

/// Number of pickups per date.
pub fn items_per_day(days: &[DayAggregate]) -> BTreeMap<DayKey, usize> {
    days.iter()
        .map(|day| (day.date.clone(), day.items.len()))
        .collect()
}
