//! Dates command: every date with at least one pickup.

use std::io::Write;

use anyhow::Result;
use ll_core::{HistoryStore, Ledger};

use super::write_json;

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    json: bool,
) -> Result<()> {
    let dates = ledger.list_dates()?;
    if json {
        return write_json(writer, &dates);
    }

    if dates.is_empty() {
        writeln!(writer, "No pickups recorded.")?;
        return Ok(());
    }
    for date in dates {
        writeln!(writer, "{date}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{JAN_1, JAN_2, ledger_with, render};

    #[test]
    fn lists_most_recent_first() {
        let (_temp, ledger) = ledger_with(&[("20240101", JAN_1), ("20240102", JAN_2)], "20240103");
        let output = render(|w| run(w, &ledger, false));
        assert_eq!(output, "20240102\n20240101\n");
    }

    #[test]
    fn json_is_an_array_of_keys() {
        let (_temp, ledger) = ledger_with(&[("20240101", JAN_1)], "20240103");
        let output = render(|w| run(w, &ledger, true));
        let parsed: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, vec!["20240101"]);
    }

    #[test]
    fn empty_directory_says_so() {
        let (_temp, ledger) = ledger_with(&[], "20240103");
        assert_eq!(render(|w| run(w, &ledger, false)), "No pickups recorded.\n");
    }
}
