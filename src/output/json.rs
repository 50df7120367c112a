//! JSON dump

use crate::output::{OutputResult, Report};
use crate::storage::Measurement;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonOutput<'a> {
    measurements: &'a [Measurement],
    statistics: &'a Report,
}

/// Pretty-printed JSON
///
/// Without statistics this is exactly the record file format, so the output
/// can be saved and loaded back. With statistics, records and statistics are
/// wrapped in one object.
pub fn write_json<W: Write>(
    mut writer: W,
    items: &[Measurement],
    report: &Report,
) -> OutputResult<()> {
    if report.is_empty() {
        serde_json::to_writer_pretty(&mut writer, items)?;
    } else {
        let output = JsonOutput {
            measurements: items,
            statistics: report,
        };
        serde_json::to_writer_pretty(&mut writer, &output)?;
    }
    writeln!(writer)?;
    Ok(())
}
