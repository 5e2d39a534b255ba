//! Forget command: drop a stored date so its log is parsed again.

use std::io::Write;

use anyhow::Result;
use ll_core::{DayKey, HistoryStore, Ledger};

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    date: &DayKey,
) -> Result<()> {
    if ledger.forget(date)? {
        writeln!(
            writer,
            "Forgot {date}; its log will be parsed again on the next read."
        )?;
    } else {
        writeln!(writer, "{date} is not stored.")?;
    }
    Ok(())
}
