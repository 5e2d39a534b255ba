//! History command: how often one item was picked up per date.

use std::io::Write;

use anyhow::Result;
use ll_core::{HistoryStore, Ledger};

use super::write_json;

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    item: &str,
    json: bool,
) -> Result<()> {
    let history = ledger.item_history(item)?;
    if json {
        return write_json(writer, &history);
    }

    if history.is_empty() {
        writeln!(writer, "No pickups of {item:?} recorded.")?;
        return Ok(());
    }
    for (date, count) in history.iter().rev() {
        writeln!(writer, "{date}  {count}")?;
    }
    writeln!(writer, "Total: {}", history.values().sum::<usize>())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{JAN_1, JAN_2, ledger_with, render};

    #[test]
    fn counts_per_date_most_recent_first() {
        let (_temp, ledger) = ledger_with(&[("20240101", JAN_1), ("20240102", JAN_2)], "20240103");
        let output = render(|w| run(w, &ledger, "Ore", false));
        assert_eq!(output, "20240102  1\n20240101  2\nTotal: 3\n");
    }

    #[test]
    fn forbidden_items_have_no_history() {
        let (_temp, ledger) = ledger_with(&[("20240101", JAN_1)], "20240103");
        let output = render(|w| run(w, &ledger, "调查", false));
        assert_eq!(output, "No pickups of \"调查\" recorded.\n");
    }

    #[test]
    fn json_maps_dates_to_counts() {
        let (_temp, ledger) = ledger_with(&[("20240102", JAN_2)], "20240103");
        let output = render(|w| run(w, &ledger, "Mint", true));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value, serde_json::json!({ "20240102": 1 }));
    }
}
