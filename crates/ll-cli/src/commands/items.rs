//! Items command: every recorded pickup.

use std::io::Write;

use anyhow::Result;
use ll_core::{HistoryStore, Ledger};

use super::write_json;

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    json: bool,
) -> Result<()> {
    let table = ledger.item_data()?;
    if json {
        return write_json(writer, &table);
    }

    if table.is_empty() {
        writeln!(writer, "No pickups recorded.")?;
        return Ok(());
    }
    let rows = table
        .dates
        .iter()
        .zip(&table.times)
        .zip(&table.names)
        .zip(&table.config_groups);
    for (((date, time), name), group) in rows {
        write!(writer, "{date} {time}  {name}")?;
        if group.is_empty() {
            writeln!(writer)?;
        } else {
            writeln!(writer, "  [{group}]")?;
        }
    }
    Ok(())
}
