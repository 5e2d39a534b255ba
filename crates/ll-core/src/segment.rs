//! Session segmentation and pickup extraction.
//!
//! # Algorithm Summary
//!
//! Entries of one day are walked in file order:
//!
//! 1. Config-group markers open and close the active group.
//! 2. Entries mentioning a forbidden keyword are skipped entirely.
//! 3. Timestamps become day-relative seconds; unparseable ones are skipped.
//! 4. Pickup lines bump the per-item count and, if their key is new to the
//!    dedup cache, produce an [`ItemPickupEvent`].
//! 5. A gap larger than the threshold closes the current session segment.
//!    A gap of zero or less is an anomaly and leaves the segments untouched.
//!
//! The threshold approximates "continuous activity" from sparse log lines;
//! it is tunable, not a physical boundary.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::dedup::DedupCache;
use crate::entry::LogEntry;
use crate::types::{DayAggregate, DayKey, ItemPickupEvent};

/// Default idle gap (seconds) that ends a session segment.
pub const DEFAULT_GAP_THRESHOLD_SECS: f64 = 300.0;

/// Names that are noise rather than real pickups.
pub const DEFAULT_FORBIDDEN_ITEMS: &[&str] = &["调查", "直接拾取"];

/// Substring that marks an "interact or pick up" line.
pub const PICKUP_MARKER: &str = "交互或拾取";

const FULLWIDTH_COLON: char = '：';

static GROUP_BEGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^配置组 "([^"]*)" 加载完成，共(\d+)个脚本，开始执行$"#)
        .expect("group regex is valid")
});

/// Tunables for parsing one day.
#[derive(Debug, Clone)]
pub struct ParseRules {
    /// Gap above which the current segment closes. Default: 300 seconds.
    pub gap_threshold_secs: f64,

    /// Entries whose message contains any of these are skipped.
    pub forbidden_keywords: Vec<String>,

    /// Item names stripped before a day is stored or shown.
    pub forbidden_items: Vec<String>,
}

impl Default for ParseRules {
    fn default() -> Self {
        let forbidden: Vec<String> = DEFAULT_FORBIDDEN_ITEMS
            .iter()
            .map(ToString::to_string)
            .collect();
        Self {
            gap_threshold_secs: DEFAULT_GAP_THRESHOLD_SECS,
            forbidden_keywords: forbidden.clone(),
            forbidden_items: forbidden,
        }
    }
}

/// Rejected [`ParseRules`] values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    #[error("invalid gap threshold {0}: must be a positive, finite number of seconds")]
    InvalidGapThreshold(f64),
}

impl ParseRules {
    /// Checks that the gap threshold can split segments.
    ///
    /// A negative threshold splits on every entry and `NaN` never splits.
    pub fn validate(&self) -> Result<(), RulesError> {
        let gap = self.gap_threshold_secs;
        if gap.is_finite() && gap > 0.0 {
            Ok(())
        } else {
            Err(RulesError::InvalidGapThreshold(gap))
        }
    }

    pub fn is_forbidden_item(&self, name: &str) -> bool {
        self.forbidden_items.iter().any(|f| f == name)
    }

    fn mentions_forbidden_keyword(&self, entry: &LogEntry) -> bool {
        self.forbidden_keywords
            .iter()
            .any(|keyword| entry.mentions(keyword))
    }
}

/// Irregularities found while parsing. Parsing always continues past them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// The entry's time could not be parsed; it was ignored.
    BadTimestamp { raw: String },
    /// The entry's time did not move forward; timing was left unchanged.
    NonMonotonic { timestamp: String, delta_seconds: f64 },
}

/// Result of parsing one day's entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayParse {
    /// Every pickup line counted by name, duplicates included.
    pub item_count: BTreeMap<String, usize>,
    pub duration_seconds: i64,
    /// Pickups not already in the dedup cache.
    pub items: Vec<ItemPickupEvent>,
    pub anomalies: Vec<Anomaly>,
}

impl DayParse {
    /// Whether any non-forbidden pickup was seen.
    pub fn qualifies(&self, rules: &ParseRules) -> bool {
        self.item_count
            .iter()
            .any(|(name, count)| *count > 0 && !rules.is_forbidden_item(name))
    }

    /// Builds the storable aggregate, dropping forbidden items.
    pub fn into_aggregate(self, date: DayKey, rules: &ParseRules) -> DayAggregate {
        let items = self
            .items
            .into_iter()
            .filter(|item| !rules.is_forbidden_item(&item.item_name))
            .collect();
        DayAggregate {
            date,
            duration_seconds: self.duration_seconds,
            items,
        }
    }
}

/// A run of entries whose gaps stay within the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SessionSegment {
    start: f64,
    end: f64,
}

impl SessionSegment {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "segment lengths are bounded by one day"
    )]
    fn whole_seconds(&self) -> i64 {
        (self.end - self.start).trunc() as i64
    }
}

/// Outcome of feeding one time into the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Started,
    Extended,
    Split,
    /// The time did not advance; carries the (non-positive) delta.
    Stalled(f64),
}

#[derive(Debug)]
struct SegmentTracker {
    gap_threshold: f64,
    open: Option<SessionSegment>,
    closed: Vec<SessionSegment>,
}

impl SegmentTracker {
    const fn new(gap_threshold: f64) -> Self {
        Self {
            gap_threshold,
            open: None,
            closed: Vec::new(),
        }
    }

    fn observe(&mut self, time: f64) -> Step {
        let Some(segment) = self.open.as_mut() else {
            self.open = Some(SessionSegment {
                start: time,
                end: time,
            });
            return Step::Started;
        };

        let delta = time - segment.end;
        if delta <= 0.0 {
            Step::Stalled(delta)
        } else if delta > self.gap_threshold {
            self.closed.push(*segment);
            *segment = SessionSegment {
                start: time,
                end: time,
            };
            Step::Split
        } else {
            segment.end = time;
            Step::Extended
        }
    }

    fn finish(mut self) -> Vec<SessionSegment> {
        if let Some(segment) = self.open.take() {
            self.closed.push(segment);
        }
        self.closed
    }
}

/// Extracts the item name from a pickup line such as `交互或拾取："Ore"`.
fn pickup_name(line: &str) -> Option<String> {
    if !line.contains(PICKUP_MARKER) {
        return None;
    }
    let (_, rest) = line.split_once(FULLWIDTH_COLON)?;
    let name = rest
        .split(FULLWIDTH_COLON)
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(['"', '“', '”'])
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Applies group markers on `line` to the active group.
fn track_group(line: &str, active: &mut Option<String>) {
    if let Some(caps) = GROUP_BEGIN_RE.captures(line) {
        *active = Some(caps[1].to_string());
        return;
    }
    let finished = active
        .as_deref()
        .is_some_and(|name| line.contains(&format!("配置组 \"{name}\" 执行结束")));
    if finished {
        *active = None;
    }
}

/// Parses one day's entries into counts, duration and new pickup events.
///
/// Keys of emitted events are recorded in `cache`; pickups whose key is
/// already present are counted but produce no event.
pub fn segment(
    entries: &[LogEntry],
    date: &DayKey,
    rules: &ParseRules,
    cache: &mut DedupCache,
) -> DayParse {
    let mut parse = DayParse::default();
    let mut tracker = SegmentTracker::new(rules.gap_threshold_secs);
    let mut active_group: Option<String> = None;

    for entry in entries {
        for line in entry.message_lines() {
            track_group(line, &mut active_group);
        }

        if rules.mentions_forbidden_keyword(entry) {
            continue;
        }

        let time = match entry.seconds() {
            Ok(time) => time,
            Err(e) => {
                tracing::warn!(
                    day = %date,
                    error = %e,
                    category = %entry.category,
                    "skipping entry with bad timestamp"
                );
                parse.anomalies.push(Anomaly::BadTimestamp {
                    raw: entry.timestamp.clone(),
                });
                continue;
            }
        };

        if let Some(item_name) = entry.message_lines().find_map(pickup_name) {
            *parse.item_count.entry(item_name.clone()).or_insert(0) += 1;
            let event = ItemPickupEvent {
                item_name,
                timestamp: entry.timestamp.clone(),
                date: date.clone(),
                config_group: active_group.clone(),
            };
            if cache.remember(event.key()) {
                parse.items.push(event);
            }
        }

        if let Step::Stalled(delta) = tracker.observe(time) {
            tracing::error!(
                day = %date,
                timestamp = %entry.timestamp,
                delta,
                "non-monotonic timestamp, session timing left unchanged"
            );
            parse.anomalies.push(Anomaly::NonMonotonic {
                timestamp: entry.timestamp.clone(),
                delta_seconds: delta,
            });
        }
    }

    parse.duration_seconds = tracker
        .finish()
        .iter()
        .map(SessionSegment::whole_seconds)
        .sum();

    tracing::debug!(
        day = %date,
        entries = entries.len(),
        items = parse.items.len(),
        duration = parse.duration_seconds,
        anomalies = parse.anomalies.len(),
        "parsed day"
    );
    parse
}
