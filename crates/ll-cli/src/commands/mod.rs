//! CLI subcommand implementations.
//!
//! Each command writes to a caller-supplied writer so tests can capture output.

pub mod dates;
pub mod durations;
pub mod forget;
pub mod history;
pub mod inspect;
pub mod items;
pub mod status;
pub mod summary;

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

/// Writes `value` as pretty JSON followed by a newline.
fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
