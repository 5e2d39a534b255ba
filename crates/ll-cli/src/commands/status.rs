//! Status command for showing configured paths and stored totals.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use ll_core::{HistoryStore, Ledger};

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    database_path: &Path,
) -> Result<()> {
    let log_dir = &ledger.config().log_dir;
    writeln!(writer, "Loot ledger status")?;
    writeln!(writer, "Log directory: {}", log_dir.display())?;
    writeln!(writer, "Database: {}", database_path.display())?;

    match ledger.scan() {
        Ok(days) => {
            write!(writer, "Log files: {}", days.len())?;
            match (days.first(), days.last()) {
                (Some(first), Some(last)) => writeln!(writer, " ({first} to {last})")?,
                _ => writeln!(writer)?,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "log directory scan failed");
            writeln!(writer, "Log files: directory not readable")?;
        }
    }

    let stats = ledger.store_stats()?;
    writeln!(
        writer,
        "Stored days: {} ({} pickups)",
        stats.days, stats.items
    )?;
    Ok(())
}
