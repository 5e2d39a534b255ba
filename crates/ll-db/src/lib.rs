//! Storage layer for loot-ledger.
//!
//! Persists committed past days using `rusqlite`. The current day is never
//! written here; see `ll_core::DayStore`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! `ll_core::Ledger` owns its backend behind a mutex, which is enough to
//! share one ledger across threads.
//!
//! # Schema
//!
//! - `log_files`: one row per committed date (`date_str` is `YYYYMMDD`).
//! - `items`: one row per pickup, cascading with its `log_files` row.
//!
//! Timestamps in `created_at` / `updated_at` are RFC 3339 UTC text.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use ll_core::{
    DayAggregate, DayInfo, DayKey, DayKeyError, HistoryStore, ItemPickupEvent, StoreError,
    StoreStats,
};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored date is not a valid day key.
    #[error("invalid stored date {value:?}")]
    InvalidDate {
        value: String,
        #[source]
        source: DayKeyError,
    },
    /// A stored `updated_at` could not be parsed.
    #[error("invalid stored timestamp {value:?}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

fn now_text() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn day_key(value: String) -> Result<DayKey, DbError> {
    DayKey::new(value.as_str()).map_err(|source| DbError::InvalidDate { value, source })
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            -- One row per committed day. date_str: YYYYMMDD.
            CREATE TABLE IF NOT EXISTS log_files (
                date_str TEXT PRIMARY KEY,
                duration INTEGER NOT NULL DEFAULT 0,
                item_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                date_str TEXT NOT NULL,
                config_group TEXT,
                FOREIGN KEY (date_str) REFERENCES log_files(date_str) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_items_date ON items(date_str);
            CREATE INDEX IF NOT EXISTS idx_items_name ON items(name);
            ",
        )?;
        Ok(())
    }

    /// Writes a day and its pickups, replacing any previous rows for the date.
    pub fn insert_day(&mut self, day: &DayAggregate) -> Result<(), DbError> {
        let now = now_text();
        let tx = self.conn.transaction()?;
        tx.execute(
            "
            INSERT INTO log_files (date_str, duration, item_count, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(date_str) DO UPDATE SET
                duration = excluded.duration,
                item_count = excluded.item_count,
                updated_at = excluded.updated_at
            ",
            params![day.date.as_str(), day.duration_seconds, day.items.len(), now],
        )?;
        tx.execute("DELETE FROM items WHERE date_str = ?", params![day.date.as_str()])?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO items (name, timestamp, date_str, config_group)
                VALUES (?, ?, ?, ?)
                ",
            )?;
            for item in &day.items {
                stmt.execute(params![
                    item.item_name,
                    item.timestamp,
                    day.date.as_str(),
                    item.config_group,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(day = %day.date, items = day.items.len(), "stored day");
        Ok(())
    }

    /// Lists committed dates.
    pub fn list_dates(&self) -> Result<BTreeSet<DayKey>, DbError> {
        let mut stmt = self.conn.prepare("SELECT date_str FROM log_files")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut dates = BTreeSet::new();
        for row in rows {
            dates.insert(day_key(row?)?);
        }
        Ok(dates)
    }

    /// Duration per committed date.
    pub fn list_durations(&self) -> Result<BTreeMap<DayKey, i64>, DbError> {
        let mut stmt = self.conn.prepare("SELECT date_str, duration FROM log_files")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut durations = BTreeMap::new();
        for row in rows {
            let (date, duration) = row?;
            durations.insert(day_key(date)?, duration);
        }
        Ok(durations)
    }

    /// Pickups grouped by date, in insertion order within each date.
    pub fn list_items(&self) -> Result<BTreeMap<DayKey, Vec<ItemPickupEvent>>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT name, timestamp, date_str, config_group
            FROM items
            ORDER BY date_str ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;
        let mut items: BTreeMap<DayKey, Vec<ItemPickupEvent>> = BTreeMap::new();
        for row in rows {
            let (item_name, timestamp, date, config_group) = row?;
            let date = day_key(date)?;
            items.entry(date.clone()).or_default().push(ItemPickupEvent {
                item_name,
                timestamp,
                date,
                config_group,
            });
        }
        Ok(items)
    }

    /// Stored metadata for one date.
    pub fn get_day_info(&self, date: &DayKey) -> Result<Option<DayInfo>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT duration, item_count, updated_at FROM log_files WHERE date_str = ?",
                params![date.as_str()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, usize>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((duration_seconds, item_count, updated_at)) = row else {
            return Ok(None);
        };
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|source| DbError::InvalidTimestamp {
                value: updated_at.clone(),
                source,
            })?
            .with_timezone(&Utc);
        Ok(Some(DayInfo {
            duration_seconds,
            item_count,
            updated_at,
        }))
    }

    /// Row counts of both tables.
    pub fn get_stats(&self) -> Result<StoreStats, DbError> {
        let days: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM log_files", [], |row| row.get(0))?;
        let items: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(StoreStats { days, items })
    }

    /// Deletes a date and its pickups. Returns whether the date existed.
    pub fn delete_day(&mut self, date: &DayKey) -> Result<bool, DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM items WHERE date_str = ?", params![date.as_str()])?;
        let removed = tx.execute(
            "DELETE FROM log_files WHERE date_str = ?",
            params![date.as_str()],
        )?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

impl HistoryStore for Database {
    fn stored_dates(&self) -> Result<BTreeSet<DayKey>, StoreError> {
        Ok(self.list_dates()?)
    }

    fn commit(&mut self, day: &DayAggregate) -> Result<(), StoreError> {
        Ok(self.insert_day(day)?)
    }

    fn durations(&self) -> Result<BTreeMap<DayKey, i64>, StoreError> {
        Ok(self.list_durations()?)
    }

    fn items(&self) -> Result<BTreeMap<DayKey, Vec<ItemPickupEvent>>, StoreError> {
        Ok(self.list_items()?)
    }

    fn day_info(&self, date: &DayKey) -> Result<Option<DayInfo>, StoreError> {
        Ok(self.get_day_info(date)?)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        Ok(self.get_stats()?)
    }

    fn forget(&mut self, date: &DayKey) -> Result<bool, StoreError> {
        Ok(self.delete_day(date)?)
    }
}
