//! Human-readable table and statistics

use crate::analysis::{classify, ClassDistribution};
use crate::output::{OutputResult, Report};
use crate::storage::Measurement;
use std::io::Write;

/// Aligned table, one line per measurement
pub fn write_table<W: Write>(
    mut writer: W,
    items: &[Measurement],
    with_class: bool,
) -> OutputResult<()> {
    if items.is_empty() {
        writeln!(writer, "No measurements")?;
        return Ok(());
    }

    write!(
        writer,
        "{:>4}  {:<6} {:<16}  {:>4}  {:>4}  {:>5}",
        "#", "Header", "Date", "Sys", "Dia", "Pulse"
    )?;
    if with_class {
        write!(writer, "  Class")?;
    }
    writeln!(writer)?;
    writeln!(writer, "{}", "-".repeat(if with_class { 72 } else { 50 }))?;

    for (i, m) in items.iter().enumerate() {
        write!(
            writer,
            "{:>4}  {:<6x} {:<16}  {:>4}  {:>4}  {:>5}",
            i + 1,
            m.header,
            m.timestamp_label(),
            m.systolic,
            m.diastolic,
            m.pulse
        )?;
        if with_class {
            write!(writer, "  {}", classify(m))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Statistics lines, in `systolic;diastolic;pulse` order
pub fn write_report_text<W: Write>(mut writer: W, report: &Report) -> OutputResult<()> {
    if let Some(average) = &report.average {
        writeln!(writer, "Average: {}", average)?;
    }
    if let Some(median) = &report.median {
        writeln!(writer, "Median: {}", median)?;
    }
    if let Some(sd) = &report.standard_deviation {
        writeln!(writer, "Standard deviation: {}", sd)?;
    }
    if let Some(mad) = &report.mean_absolute_deviation {
        writeln!(writer, "Mean absolute deviation: {}", mad)?;
    }
    if let Some(distribution) = &report.class_distribution {
        write_distribution(&mut writer, distribution)?;
    }
    Ok(())
}

fn write_distribution<W: Write>(
    mut writer: W,
    distribution: &ClassDistribution,
) -> OutputResult<()> {
    writeln!(writer, "WHO classification ({} measurements):", distribution.total)?;
    for entry in &distribution.classes {
        writeln!(
            writer,
            "  {:<24} {:>4}  {:>5.1}%",
            entry.class.label(),
            entry.count,
            entry.percent
        )?;
    }
    writeln!(
        writer,
        "  Isolated Systolic Hypertension: {}",
        distribution.isolated_systolic
    )?;
    writeln!(
        writer,
        "  Average classification: {} ({:.2})",
        distribution.average_class, distribution.average_ordinal
    )?;
    Ok(())
}
