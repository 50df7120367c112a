//! CSV rows

use crate::analysis::classify;
use crate::output::OutputResult;
use crate::storage::Measurement;
use std::io::Write;

/// Write one `;`-separated row per measurement, numbered from 1
///
/// `1;80;2016-06-01 08:05;120;80;60[;Optimal]`
pub fn write_csv<W: Write>(
    writer: W,
    items: &[Measurement],
    with_class: bool,
) -> OutputResult<()> {
    let mut csv = ::csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);

    for (i, m) in items.iter().enumerate() {
        let mut row = vec![
            (i + 1).to_string(),
            format!("{:x}", m.header),
            m.timestamp_label(),
            m.systolic.to_string(),
            m.diastolic.to_string(),
            m.pulse.to_string(),
        ];
        if with_class {
            row.push(classify(m).to_string());
        }
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv() {
        let items = vec![
            Measurement::new(145, 85, 71).at(2016, 6, 2, 21, 30).header(0x80),
            Measurement::new(118, 76, 64).at(2016, 6, 1, 7, 5).header(0x0c),
        ];

        let mut out = Vec::new();
        write_csv(&mut out, &items, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1;80;2016-06-02 21:30;145;85;71\n2;c;2016-06-01 07:05;118;76;64\n"
        );

        let mut out = Vec::new();
        write_csv(&mut out, &items, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1;80;2016-06-02 21:30;145;85;71;Mild Hypertension (Isolated Systolic Hypertension)\n\
             2;c;2016-06-01 07:05;118;76;64;Optimal\n"
        );
    }

    #[test]
    fn test_write_csv_empty() {
        let mut out = Vec::new();
        write_csv(&mut out, &[], true).unwrap();
        assert!(out.is_empty());
    }
}
