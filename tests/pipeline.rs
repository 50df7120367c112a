//! End-to-end: device exchange, record file merge, filter and statistics

use bm65::analysis::{average, class_distribution, BpClass};
use bm65::device::DeviceClient;
use bm65::output::{render, OutputFormat, Report};
use bm65::query::{parse_time, Filter};
use bm65::storage::{load_file, merge, save_file, Measurement};
use std::io::{self, Cursor, Read, Write};

/// Replies queued up front; the exchange is fixed so order is enough
struct FakeMonitor {
    replies: Cursor<Vec<u8>>,
    written: Vec<u8>,
}

impl FakeMonitor {
    fn with_records(records: &[[u8; 9]]) -> Self {
        let mut replies = vec![0x55];
        replies.extend_from_slice(b"BM65 fake monitor               ");
        replies.push(records.len() as u8);
        for record in records {
            replies.extend_from_slice(record);
        }
        Self {
            replies: Cursor::new(replies),
            written: Vec::new(),
        }
    }
}

impl Read for FakeMonitor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.replies.read(buf)
    }
}

impl Write for FakeMonitor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_fetch_merge_filter_report() {
    // Stored in device order, oldest first
    let monitor = FakeMonitor::with_records(&[
        [0x80, 95, 55, 60, 6, 1, 7, 30, 16],  // 120/80 morning
        [0x80, 120, 65, 70, 6, 1, 22, 15, 16], // 145/90 evening
        [0x80, 90, 50, 58, 6, 2, 23, 45, 16],  // 115/75 late evening
    ]);
    let fetched = DeviceClient::new(monitor).fetch().unwrap();
    assert_eq!(fetched.len(), 3);
    assert_eq!(fetched[0], Measurement::new(115, 75, 58).at(2016, 6, 2, 23, 45).header(0x80));

    // The file already holds the morning reading plus an older one
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data_u1.json");
    let stored = vec![
        Measurement::new(120, 80, 60).at(2016, 6, 1, 7, 30).header(0x80),
        Measurement::new(130, 85, 66).at(2016, 5, 30, 8, 0).header(0x80),
    ];
    save_file(&path, &stored).unwrap();

    let merged = merge(&fetched, &load_file(&path).unwrap());
    assert_eq!(merged.len(), 4);
    save_file(&path, &merged).unwrap();
    assert_eq!(load_file(&path).unwrap(), merged);

    // Evening readings only, across midnight
    let evening = Filter::new()
        .from_time(parse_time("21:00").unwrap())
        .to_time(parse_time("06:00").unwrap())
        .apply(merged);
    assert_eq!(evening.len(), 2);

    assert_eq!(average(&evening).unwrap().to_string(), "130;83;64");
    let distribution = class_distribution(&evening).unwrap();
    assert_eq!(distribution.classes[BpClass::Optimal.ordinal()].count, 1);
    assert_eq!(distribution.classes[BpClass::MildHypertension.ordinal()].count, 1);

    let mut out = Vec::new();
    render(&mut out, &evening, &Report::default(), OutputFormat::Csv, false).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "1;80;2016-06-02 23:45;115;75;58\n2;80;2016-06-01 22:15;145;90;70\n"
    );
}
