//! Inspect command: a diagnostic parse of one log file.
//!
//! Nothing is stored. Counts are raw (forbidden names and duplicates
//! included) and anomalies are listed, which makes a day that shows no data
//! distinguishable from one whose file is broken.

use std::io::Write;

use anyhow::{Context, Result};
use ll_core::{Anomaly, DayKey, HistoryStore, Ledger, format_duration};

use super::write_json;

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    date: &DayKey,
    json: bool,
) -> Result<()> {
    let path = ledger.config().log_path(date);
    let parse = ledger
        .parse_day(date)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if json {
        return write_json(writer, &parse);
    }

    writeln!(writer, "Log file: {}", path.display())?;
    writeln!(
        writer,
        "Duration: {} ({}s)",
        format_duration(parse.duration_seconds),
        parse.duration_seconds
    )?;

    if parse.item_count.is_empty() {
        writeln!(writer, "Pickups: none")?;
    } else {
        writeln!(writer, "Pickups:")?;
        let rules = &ledger.config().rules;
        for (name, count) in &parse.item_count {
            let note = if rules.is_forbidden_item(name) {
                " (ignored)"
            } else {
                ""
            };
            writeln!(writer, "  {name}: {count}{note}")?;
        }
    }

    if parse.anomalies.is_empty() {
        writeln!(writer, "Anomalies: none")?;
    } else {
        writeln!(writer, "Anomalies:")?;
        for anomaly in &parse.anomalies {
            match anomaly {
                Anomaly::BadTimestamp { raw } => {
                    writeln!(writer, "  unparseable timestamp {raw:?}")?;
                }
                Anomaly::NonMonotonic {
                    timestamp,
                    delta_seconds,
                } => {
                    writeln!(
                        writer,
                        "  timestamp {timestamp} went back {:.3}s",
                        -delta_seconds
                    )?;
                }
            }
        }
    }
    Ok(())
}
