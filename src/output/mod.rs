//! Presentation of measurements and statistics
//!
//! - **csv**: `;`-separated rows, one per measurement, no header
//! - **json**: the record file format, or an object with statistics
//! - **text**: aligned table for reading in a terminal
//!
//! Every format keeps the same field order: index, header (hex), timestamp,
//! systolic, diastolic, pulse and optionally the classification.

mod csv;
mod json;
mod text;

use crate::analysis::ClassDistribution;
use crate::storage::{Measurement, Vitals};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

pub use self::csv::write_csv;
pub use self::json::write_json;
pub use self::text::{write_report_text, write_table};

/// Errors while rendering output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "text" | "table" => Ok(OutputFormat::Text),
            other => Err(format!(
                "Unknown output format: {}. Possible choices are csv, json, text",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Statistics selected for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<Vitals<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<Vitals<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_deviation: Option<Vitals<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_absolute_deviation: Option<Vitals<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_distribution: Option<ClassDistribution>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Render measurements and statistics in `format`
pub fn render<W: Write>(
    mut writer: W,
    items: &[Measurement],
    report: &Report,
    format: OutputFormat,
    with_class: bool,
) -> OutputResult<()> {
    match format {
        OutputFormat::Json => write_json(&mut writer, items, report)?,
        OutputFormat::Csv => {
            write_csv(&mut writer, items, with_class)?;
            write_report_text(&mut writer, report)?;
        }
        OutputFormat::Text => {
            write_table(&mut writer, items, with_class)?;
            if !report.is_empty() {
                writeln!(writer)?;
            }
            write_report_text(&mut writer, report)?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Text.to_string(), "text");
    }

    #[test]
    fn test_render_csv_with_average() {
        let items = vec![Measurement::new(120, 80, 60).at(2016, 6, 1, 8, 5).header(0x80)];
        let report = Report {
            average: Some(Vitals::new(120, 80, 60)),
            ..Default::default()
        };

        let mut out = Vec::new();
        render(&mut out, &items, &report, OutputFormat::Csv, false).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1;80;2016-06-01 08:05;120;80;60\nAverage: 120;80;60\n"
        );
    }
}
