//! Core domain logic for loot-ledger.
//!
//! This crate contains:
//! - Tokenizing: splitting agent log text into entries
//! - Segmentation: per-day pickup counts and active duration
//! - Storage: the historical/today day store and its in-memory backend
//! - The [`Ledger`] facade that keeps the store in sync with the log directory

pub mod analysis;
mod dedup;
pub mod entry;
mod ledger;
pub mod segment;
pub mod store;
mod table;
mod types;

pub use analysis::{Summary, format_duration};
pub use dedup::DedupCache;
pub use entry::{LogEntry, TimestampError, tokenize};
pub use ledger::{
    Clock, DEFAULT_FILE_PREFIX, FixedClock, Ledger, LedgerConfig, LedgerError, SystemClock,
};
pub use segment::{Anomaly, DayParse, ParseRules, RulesError, segment};
pub use store::{DayInfo, DayStore, HistoryStore, MemoryStore, Partition, StoreError, StoreStats};
pub use table::{DurationTable, ItemTable};
pub use types::{DayAggregate, DayKey, DayKeyError, ItemPickupEvent, PickupKey};
