//! Summary command: total duration and pickup counts.

use std::io::Write;

use anyhow::Result;
use ll_core::{DayKey, HistoryStore, Ledger, Summary};

use super::write_json;

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    date: Option<&DayKey>,
    json: bool,
) -> Result<()> {
    let summary = match date {
        Some(date) => ledger.day_summary(date)?,
        None => ledger.summary()?,
    };
    if json {
        return write_json(writer, &summary);
    }

    if let Some(date) = date {
        writeln!(writer, "Date: {date}")?;
    }
    writeln!(writer, "Total: {}", summary.formatted_duration())?;
    write_counts(writer, &summary)
}

/// Item counts, most frequent first.
fn write_counts<W: Write>(writer: &mut W, summary: &Summary) -> Result<()> {
    if summary.item_counts.is_empty() {
        writeln!(writer, "No pickups recorded.")?;
        return Ok(());
    }

    let mut counts: Vec<(&String, &usize)> = summary.item_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    writeln!(writer, "Items:")?;
    for (name, count) in counts {
        writeln!(writer, "  {name}: {count}")?;
    }
    Ok(())
}
