//! Durations command: active time per date.

use std::io::Write;

use anyhow::Result;
use ll_core::{HistoryStore, Ledger, format_duration};

use super::write_json;

pub fn run<W: Write, S: HistoryStore>(
    writer: &mut W,
    ledger: &Ledger<S>,
    json: bool,
) -> Result<()> {
    let table = ledger.duration_data()?;
    if json {
        return write_json(writer, &table);
    }

    for (date, seconds) in table.dates.iter().zip(&table.seconds) {
        writeln!(writer, "{date}  {}", format_duration(*seconds))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{JAN_1, JAN_2, ledger_with, render};

    use insta::assert_snapshot;

    #[test]
    fn formats_each_date() {
        let (_temp, ledger) = ledger_with(&[("20240101", JAN_1), ("20240102", JAN_2)], "20240103");
        let output = render(|w| run(w, &ledger, false));
        assert_snapshot!(output, @r"
        20240102  4分钟
        20240101  2分钟
        ");
    }

    #[test]
    fn json_keeps_parallel_arrays() {
        let (_temp, ledger) = ledger_with(&[("20240101", JAN_1), ("20240102", JAN_2)], "20240103");
        let output = render(|w| run(w, &ledger, true));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["dates"], serde_json::json!(["20240102", "20240101"]));
        assert_eq!(value["seconds"], serde_json::json!([240, 120]));
    }
}
