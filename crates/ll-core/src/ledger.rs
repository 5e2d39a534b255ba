//! Aggregation facade over a directory of daily agent logs.
//!
//! Every read runs the same sequence under one lock:
//!
//! 1. Scan the log directory for `<prefix><YYYYMMDD>.log` files.
//! 2. Parse and commit backlog: past days on disk that the store lacks.
//! 3. Load the committed past days.
//! 4. Re-derive today from its file, from scratch.
//! 5. Drop days without a qualifying pickup and put today first.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use thiserror::Error;

use crate::analysis::{self, Summary};
use crate::dedup::DedupCache;
use crate::entry::tokenize;
use crate::segment::{DayParse, ParseRules, segment};
use crate::store::{DayInfo, DayStore, HistoryStore, Partition, StoreError, StoreStats};
use crate::table::{DurationTable, ItemTable};
use crate::types::{DayAggregate, DayKey};

/// File name prefix the agent uses for its daily logs.
pub const DEFAULT_FILE_PREFIX: &str = "better-genshin-impact";

const LOG_EXTENSION: &str = ".log";

/// Errors surfaced by [`Ledger`] reads.
///
/// Unreadable or malformed log files are not errors; they are logged and
/// contribute nothing.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to scan log directory {}", path.display())]
    ScanDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A backlog day could not be committed. It stays eligible for retry.
    #[error("failed to commit day {day}")]
    Commit {
        day: DayKey,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Source of the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> DayKey;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DayKey {
        DayKey::from_date(Local::now().date_naive())
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DayKey);

impl Clock for FixedClock {
    fn today(&self) -> DayKey {
        self.0.clone()
    }
}

/// Where the logs live and how to read them.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub log_dir: PathBuf,
    pub file_prefix: String,
    pub rules: ParseRules,
}

impl LedgerConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            rules: ParseRules::default(),
        }
    }

    /// Path of the log file for `day`.
    pub fn log_path(&self, day: &DayKey) -> PathBuf {
        self.log_dir
            .join(format!("{}{day}{LOG_EXTENSION}", self.file_prefix))
    }

    /// Day encoded in a log file name, if it is one of ours.
    fn day_of(&self, file_name: &str) -> Option<DayKey> {
        let middle = file_name
            .strip_prefix(self.file_prefix.as_str())?
            .strip_suffix(LOG_EXTENSION)?;
        DayKey::new(middle).ok()
    }
}

struct LedgerState<S> {
    store: DayStore<S>,
    cache: DedupCache,
}

/// Queryable per-day pickups and activity durations.
///
/// Owns the historical store and the dedup cache. All reads take `&self` and
/// are serialized internally, so a `Ledger` can be shared across threads when
/// its backend is `Send`.
pub struct Ledger<S> {
    config: LedgerConfig,
    clock: Box<dyn Clock>,
    state: Mutex<LedgerState<S>>,
}

impl<S: HistoryStore> Ledger<S> {
    pub fn new(config: LedgerConfig, backend: S) -> Self {
        Self {
            config,
            clock: Box::new(SystemClock),
            state: Mutex::new(LedgerState {
                store: DayStore::new(backend),
                cache: DedupCache::new(),
            }),
        }
    }

    /// Replaces the source of "today".
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState<S>> {
        // Parsing never leaves the state half-updated, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dates that have a log file on disk.
    pub fn scan(&self) -> Result<BTreeSet<DayKey>, LedgerError> {
        let dir = &self.config.log_dir;
        let entries = fs::read_dir(dir).map_err(|source| LedgerError::ScanDir {
            path: dir.clone(),
            source,
        })?;

        Ok(self.days_from_names(entries.map(|entry| entry.map(|e| e.file_name()))))
    }

    /// Keeps the names that are log files of ours. Unreadable entries are logged and skipped.
    fn days_from_names(
        &self,
        names: impl IntoIterator<Item = io::Result<OsString>>,
    ) -> BTreeSet<DayKey> {
        let mut days = BTreeSet::new();
        for name in names {
            let name = match name {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(
                        path = ?self.config.log_dir,
                        error = %e,
                        "skipping unreadable directory entry"
                    );
                    continue;
                }
            };
            let Some(name) = name.to_str() else {
                tracing::debug!(file = ?name, "ignoring non-UTF-8 file name");
                continue;
            };
            match self.config.day_of(name) {
                Some(day) => {
                    days.insert(day);
                }
                None => tracing::debug!(file = name, "ignoring non-log file"),
            }
        }
        days
    }

    /// Parses the file for `day` without touching the store or the cache.
    ///
    /// Useful for diagnostics: anomalies and raw counts are kept.
    pub fn parse_day(&self, day: &DayKey) -> io::Result<DayParse> {
        let content = fs::read_to_string(self.config.log_path(day))?;
        Ok(segment(
            &tokenize(&content),
            day,
            &self.config.rules,
            &mut DedupCache::new(),
        ))
    }

    /// All visible days, most recent first.
    pub fn days(&self) -> Result<Vec<DayAggregate>, LedgerError> {
        let today = self.clock.today();
        let mut state = self.lock();
        let on_disk = self.scan()?;

        self.ingest_backlog(&mut state, &on_disk, &today)?;

        let mut days: Vec<DayAggregate> = state
            .store
            .historical_days(&today)?
            .into_iter()
            .filter_map(|day| self.visible(day))
            .collect();
        days.sort_by(|a, b| b.date.cmp(&a.date));

        if on_disk.contains(&today) {
            if let Some(current) = self.derive_today(&mut state, &today) {
                days.insert(0, current);
            }
        }
        Ok(days)
    }

    /// Dates with at least one qualifying pickup, most recent first.
    pub fn list_dates(&self) -> Result<Vec<DayKey>, LedgerError> {
        Ok(self.days()?.into_iter().map(|day| day.date).collect())
    }

    pub fn duration_data(&self) -> Result<DurationTable, LedgerError> {
        Ok(DurationTable::from_days(&self.days()?))
    }

    pub fn item_data(&self) -> Result<ItemTable, LedgerError> {
        Ok(ItemTable::from_days(&self.days()?))
    }

    pub fn summary(&self) -> Result<Summary, LedgerError> {
        Ok(analysis::summarize(&self.days()?))
    }

    pub fn day_summary(&self, date: &DayKey) -> Result<Summary, LedgerError> {
        Ok(analysis::summarize_day(&self.days()?, date))
    }

    pub fn item_history(&self, item_name: &str) -> Result<BTreeMap<DayKey, usize>, LedgerError> {
        Ok(analysis::item_history(&self.days()?, item_name))
    }

    pub fn duration_history(&self) -> Result<BTreeMap<DayKey, i64>, LedgerError> {
        Ok(analysis::duration_history(&self.days()?))
    }

    pub fn items_per_day(&self) -> Result<BTreeMap<DayKey, usize>, LedgerError> {
        Ok(analysis::items_per_day(&self.days()?))
    }

    pub fn day_info(&self, date: &DayKey) -> Result<Option<DayInfo>, LedgerError> {
        Ok(self.lock().store.day_info(date)?)
    }

    pub fn store_stats(&self) -> Result<StoreStats, LedgerError> {
        Ok(self.lock().store.stats()?)
    }

    /// Removes a committed day so the next read ingests its file again.
    pub fn forget(&self, date: &DayKey) -> Result<bool, LedgerError> {
        let mut state = self.lock();
        let removed = state.store.forget(date)?;
        state.cache.forget_day(date);
        tracing::info!(day = %date, removed, "forgot stored day");
        Ok(removed)
    }

    fn ingest_backlog(
        &self,
        state: &mut LedgerState<S>,
        on_disk: &BTreeSet<DayKey>,
        today: &DayKey,
    ) -> Result<(), LedgerError> {
        let stored = state.store.stored_dates()?;
        let backlog: Vec<&DayKey> = on_disk
            .iter()
            .filter(|day| Partition::of(day, today) == Partition::Historical)
            .filter(|day| !stored.contains(*day))
            .collect();

        if !backlog.is_empty() {
            tracing::debug!(count = backlog.len(), "ingesting backlog days");
        }

        for day in backlog {
            // The store does not have this day, so any cached keys for it are stale.
            state.cache.forget_day(day);
            let Some(parse) = self.read_and_parse(day, &mut state.cache) else {
                continue;
            };
            let aggregate = parse.into_aggregate(day.clone(), &self.config.rules);
            state
                .store
                .commit(&aggregate, today)
                .map_err(|source| LedgerError::Commit {
                    day: day.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn derive_today(&self, state: &mut LedgerState<S>, today: &DayKey) -> Option<DayAggregate> {
        // Today's file is re-read in full, so its previous keys must not suppress events.
        state.cache.forget_day(today);
        let parse = self.read_and_parse(today, &mut state.cache)?;
        if !parse.qualifies(&self.config.rules) {
            return None;
        }
        self.visible(parse.into_aggregate(today.clone(), &self.config.rules))
    }

    fn read_and_parse(&self, day: &DayKey, cache: &mut DedupCache) -> Option<DayParse> {
        let path = self.config.log_path(day);
        match fs::read_to_string(&path) {
            Ok(content) => Some(segment(&tokenize(&content), day, &self.config.rules, cache)),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "skipping unreadable log file");
                None
            }
        }
    }

    /// Strips forbidden items and keeps the day only if something is left.
    fn visible(&self, mut day: DayAggregate) -> Option<DayAggregate> {
        day.items
            .retain(|item| !self.config.rules.is_forbidden_item(&item.item_name));
        day.is_visible().then_some(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::store::MemoryStore;
    use crate::types::ItemPickupEvent;

    const EXAMPLE: &str = "[10:00:00.000][INFO]X\n交互或拾取：\"Ore\"\n\
                           [10:01:00.000][INFO]X\n交互或拾取：\"调查\"\n\
                           [10:02:00.000][INFO]X\n交互或拾取：\"Ore\"\n";

    fn key(s: &str) -> DayKey {
        DayKey::new(s).unwrap()
    }

    fn write_log(dir: &Path, day: &str, content: &str) {
        fs::write(dir.join(format!("{DEFAULT_FILE_PREFIX}{day}.log")), content).unwrap();
    }

    fn ledger_at(dir: &Path, today: &str) -> Ledger<MemoryStore> {
        Ledger::new(LedgerConfig::new(dir), MemoryStore::new())
            .with_clock(FixedClock(key(today)))
    }

    /// A clock the test can move forward.
    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<DayKey>>);

    impl Clock for ManualClock {
        fn today(&self) -> DayKey {
            self.0.lock().unwrap().clone()
        }
    }

    /// Counts commits and can be told to fail them.
    #[derive(Default, Clone)]
    struct ProbeStore {
        inner: MemoryStore,
        commits: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl HistoryStore for ProbeStore {
        fn stored_dates(&self) -> Result<BTreeSet<DayKey>, StoreError> {
            self.inner.stored_dates()
        }

        fn commit(&mut self, day: &DayAggregate) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("disk full".into()));
            }
            self.commits.fetch_add(1, Ordering::SeqCst);
            self.inner.commit(day)
        }

        fn durations(&self) -> Result<BTreeMap<DayKey, i64>, StoreError> {
            self.inner.durations()
        }

        fn items(&self) -> Result<BTreeMap<DayKey, Vec<ItemPickupEvent>>, StoreError> {
            self.inner.items()
        }

        fn day_info(&self, date: &DayKey) -> Result<Option<DayInfo>, StoreError> {
            self.inner.day_info(date)
        }

        fn stats(&self) -> Result<StoreStats, StoreError> {
            self.inner.stats()
        }

        fn forget(&mut self, date: &DayKey) -> Result<bool, StoreError> {
            self.inner.forget(date)
        }
    }

    #[test]
    fn example_day_as_history() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        let ledger = ledger_at(temp.path(), "20240102");

        assert_eq!(ledger.list_dates().unwrap(), vec![key("20240101")]);
        let durations = ledger.duration_data().unwrap();
        assert_eq!(durations.seconds, vec![120]);
        let items = ledger.item_data().unwrap();
        assert_eq!(items.names, vec!["Ore", "Ore"]);
        assert_eq!(items.times, vec!["10:00:00.000", "10:02:00.000"]);
        assert_eq!(items.config_groups, vec!["", ""]);
        assert_eq!(ledger.store_stats().unwrap(), StoreStats { days: 1, items: 2 });
    }

    #[test]
    fn example_day_as_today_is_never_stored() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        let ledger = ledger_at(temp.path(), "20240101");

        assert_eq!(ledger.list_dates().unwrap(), vec![key("20240101")]);
        assert_eq!(ledger.duration_data().unwrap().seconds, vec![120]);
        assert_eq!(ledger.store_stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn repeated_reads_are_identical() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        write_log(temp.path(), "20240103", EXAMPLE);
        let ledger = ledger_at(temp.path(), "20240103");

        let first = ledger.days().unwrap();
        let second = ledger.days().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].date, key("20240103"));
    }

    #[test]
    fn rereading_today_does_not_double_items() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        let ledger = ledger_at(temp.path(), "20240101");

        assert_eq!(ledger.item_data().unwrap().len(), 2);
        assert_eq!(ledger.item_data().unwrap().len(), 2);
        assert_eq!(ledger.summary().unwrap().item_counts.get("Ore"), Some(&2));
    }

    #[test]
    fn today_picks_up_appended_lines() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        let ledger = ledger_at(temp.path(), "20240101");
        assert_eq!(ledger.item_data().unwrap().len(), 2);

        let appended = format!("{EXAMPLE}[10:03:00.000][INFO]X\n交互或拾取：\"Mint\"\n");
        write_log(temp.path(), "20240101", &appended);

        assert_eq!(ledger.item_data().unwrap().len(), 3);
        assert_eq!(ledger.duration_data().unwrap().seconds, vec![180]);
    }

    #[test]
    fn date_with_only_forbidden_pickups_is_hidden() {
        let temp = tempfile::tempdir().unwrap();
        let content = "[10:00:00.000] [INF] X\n交互或拾取：\"调查\"\n\
                       [10:02:00.000] [INF] X\n交互或拾取：\"调查\"\n";
        write_log(temp.path(), "20240101", content);
        write_log(temp.path(), "20240102", content);

        let mut config = LedgerConfig::new(temp.path());
        config.rules.forbidden_keywords.clear();
        let ledger =
            Ledger::new(config, MemoryStore::new()).with_clock(FixedClock(key("20240102")));

        let parse = ledger.parse_day(&key("20240101")).unwrap();
        assert_eq!(parse.item_count.get("调查"), Some(&2));
        assert_eq!(parse.duration_seconds, 120);

        assert!(ledger.list_dates().unwrap().is_empty());
        // Past day is still committed so it is not parsed again.
        assert_eq!(ledger.store_stats().unwrap(), StoreStats { days: 1, items: 0 });
    }

    #[test]
    fn committed_day_ignores_later_file_changes() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        let ledger = ledger_at(temp.path(), "20240105");
        assert_eq!(ledger.duration_data().unwrap().seconds, vec![120]);

        write_log(
            temp.path(),
            "20240101",
            "[09:00:00.000] [INF] X\n交互或拾取：\"Ore\"\n[09:04:00.000] [INF] X\n",
        );
        assert_eq!(ledger.duration_data().unwrap().seconds, vec![120]);
    }

    #[test]
    fn forget_reingests_the_current_file() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        let ledger = ledger_at(temp.path(), "20240105");
        assert_eq!(ledger.item_data().unwrap().len(), 2);

        write_log(
            temp.path(),
            "20240101",
            "[10:00:00.000][INFO]X\n交互或拾取：\"Ore\"\n[10:04:00.000][INFO]X\n",
        );
        assert!(ledger.forget(&key("20240101")).unwrap());

        let items = ledger.item_data().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(ledger.duration_data().unwrap().seconds, vec![240]);
    }

    #[test]
    fn rollover_turns_yesterday_into_backlog() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240102", EXAMPLE);
        let today = Arc::new(Mutex::new(key("20240102")));
        let ledger = Ledger::new(LedgerConfig::new(temp.path()), MemoryStore::new())
            .with_clock(ManualClock(Arc::clone(&today)));

        assert_eq!(ledger.list_dates().unwrap(), vec![key("20240102")]);
        assert!(ledger.day_info(&key("20240102")).unwrap().is_none());

        *today.lock().unwrap() = key("20240103");

        assert_eq!(ledger.list_dates().unwrap(), vec![key("20240102")]);
        let info = ledger.day_info(&key("20240102")).unwrap().unwrap();
        assert_eq!(info.duration_seconds, 120);
        assert_eq!(info.item_count, 2);
        assert_eq!(ledger.item_data().unwrap().len(), 2);
    }

    #[test]
    fn failed_commit_surfaces_and_stays_retryable() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        let store = ProbeStore::default();
        let fail = Arc::clone(&store.fail);
        fail.store(true, Ordering::SeqCst);
        let ledger = Ledger::new(LedgerConfig::new(temp.path()), store)
            .with_clock(FixedClock(key("20240105")));

        let err = ledger.list_dates().unwrap_err();
        assert!(matches!(err, LedgerError::Commit { ref day, .. } if *day == key("20240101")));
        assert_eq!(ledger.store_stats().unwrap().days, 0);

        fail.store(false, Ordering::SeqCst);
        assert_eq!(ledger.list_dates().unwrap(), vec![key("20240101")]);
    }

    #[test]
    fn unreadable_file_is_skipped_and_not_committed() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20231231", EXAMPLE);
        fs::write(
            temp.path().join(format!("{DEFAULT_FILE_PREFIX}20240101.log")),
            [0xff, 0xfe, 0x00, 0x5b],
        )
        .unwrap();
        let ledger = ledger_at(temp.path(), "20240105");

        assert_eq!(ledger.list_dates().unwrap(), vec![key("20231231")]);
        assert!(ledger.day_info(&key("20240101")).unwrap().is_none());
    }

    #[test]
    fn scan_ignores_foreign_file_names() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        fs::write(temp.path().join("other20240102.log"), EXAMPLE).unwrap();
        fs::write(temp.path().join(format!("{DEFAULT_FILE_PREFIX}2024.log")), EXAMPLE).unwrap();
        fs::write(temp.path().join(format!("{DEFAULT_FILE_PREFIX}20240230.log")), EXAMPLE).unwrap();
        fs::write(temp.path().join(format!("{DEFAULT_FILE_PREFIX}20240103.txt")), EXAMPLE).unwrap();
        let ledger = ledger_at(temp.path(), "20240105");

        let days: Vec<DayKey> = ledger.scan().unwrap().into_iter().collect();
        assert_eq!(days, vec![key("20240101")]);
    }

    #[test]
    fn unreadable_directory_entries_are_skipped() {
        let ledger = ledger_at(Path::new("/unused"), "20240105");
        let names = vec![
            Ok(OsString::from(format!("{DEFAULT_FILE_PREFIX}20240101.log"))),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Ok(OsString::from("notes.txt")),
            Ok(OsString::from(format!("{DEFAULT_FILE_PREFIX}20240102.log"))),
        ];
        let days: Vec<DayKey> = ledger.days_from_names(names).into_iter().collect();
        assert_eq!(days, vec![key("20240101"), key("20240102")]);
    }

    #[test]
    fn missing_log_directory_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let ledger = ledger_at(&temp.path().join("absent"), "20240105");
        assert!(matches!(
            ledger.list_dates().unwrap_err(),
            LedgerError::ScanDir { .. }
        ));
    }

    #[test]
    fn dates_sort_descending_with_today_first() {
        let temp = tempfile::tempdir().unwrap();
        for day in ["20240101", "20240103", "20240102", "20240104"] {
            write_log(temp.path(), day, EXAMPLE);
        }
        let ledger = ledger_at(temp.path(), "20240104");
        let dates: Vec<String> = ledger
            .list_dates()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(dates, vec!["20240104", "20240103", "20240102", "20240101"]);
    }

    #[test]
    fn concurrent_readers_commit_each_day_once() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        write_log(temp.path(), "20240102", EXAMPLE);
        let store = ProbeStore::default();
        let commits = Arc::clone(&store.commits);
        let ledger = Arc::new(
            Ledger::new(LedgerConfig::new(temp.path()), store)
                .with_clock(FixedClock(key("20240105"))),
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.list_dates().unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().len(), 2);
        }
        assert_eq!(commits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn analysis_helpers_cover_visible_days() {
        let temp = tempfile::tempdir().unwrap();
        write_log(temp.path(), "20240101", EXAMPLE);
        write_log(
            temp.path(),
            "20240102",
            "[08:00:00.000] [INF] X\n交互或拾取：\"Mint\"\n[09:00:00.000] [INF] X\n交互或拾取：\"Ore\"\n",
        );
        let ledger = ledger_at(temp.path(), "20240102");

        let history = ledger.item_history("Ore").unwrap();
        assert_eq!(history.get(&key("20240101")), Some(&2));
        assert_eq!(history.get(&key("20240102")), Some(&1));

        let minutes = ledger.duration_history().unwrap();
        assert_eq!(minutes.get(&key("20240101")), Some(&2));
        // Two single-entry segments, one hour apart.
        assert_eq!(minutes.get(&key("20240102")), Some(&0));

        let per_day = ledger.items_per_day().unwrap();
        assert_eq!(per_day.get(&key("20240102")), Some(&2));

        let day = ledger.day_summary(&key("20240102")).unwrap();
        assert_eq!(day.item_counts.len(), 2);
    }
}
