//! Parallel-array shapes handed to the API layer.

use serde::Serialize;

use crate::types::DayAggregate;

/// Durations as parallel `dates` / `seconds` sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DurationTable {
    pub dates: Vec<String>,
    pub seconds: Vec<i64>,
}

/// Pickups as parallel name / time / date / group sequences.
///
/// `config_groups` holds an empty string for pickups outside any group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemTable {
    pub names: Vec<String>,
    pub times: Vec<String>,
    pub dates: Vec<String>,
    pub config_groups: Vec<String>,
}

impl DurationTable {
    pub fn from_days(days: &[DayAggregate]) -> Self {
        let mut table = Self::default();
        for day in days {
            table.dates.push(day.date.to_string());
            table.seconds.push(day.duration_seconds);
        }
        table
    }
}

impl ItemTable {
    pub fn from_days(days: &[DayAggregate]) -> Self {
        let mut table = Self::default();
        for item in days.iter().flat_map(|day| &day.items) {
            table.names.push(item.item_name.clone());
            table.times.push(item.timestamp.clone());
            table.dates.push(item.date.to_string());
            table
                .config_groups
                .push(item.config_group.clone().unwrap_or_default());
        }
        table
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
