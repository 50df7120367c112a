//! Byte channel to the monitor
//!
//! The protocol client talks to any `Read + Write` value. In production this
//! is a serial port opened with [`open_serial`]; tests use in-memory
//! channels.

use crate::device::error::{DeviceError, DeviceResult};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read};
use std::time::{Duration, Instant};

/// Line speed of the BM65 serial interface
pub const DEFAULT_BAUD_RATE: u32 = 4800;

/// Timeout of a single serial read
///
/// Reads wake up this often so the exchange deadline can be checked.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Serial device path (e.g. `/dev/ttyUSB0`)
    pub path: String,
    pub baud_rate: u32,
    /// Give up when the device is silent this long; `None` waits forever
    pub read_timeout: Option<Duration>,
}

impl SerialSettings {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: None,
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// Open the serial port, 8N1 without flow control
pub fn open_serial(settings: &SerialSettings) -> DeviceResult<Box<dyn SerialPort>> {
    tracing::debug!(
        path = %settings.path,
        baud_rate = settings.baud_rate,
        "Opening serial device"
    );

    serialport::new(settings.path.as_str(), settings.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(POLL_INTERVAL)
        .open()
        .map_err(|source| DeviceError::Open {
            path: settings.path.clone(),
            source,
        })
}

/// Read until `buf` is full, the stream ends, or an error occurs
///
/// Returns the number of bytes read, which is less than `buf.len()` only at
/// end of stream. Interrupted reads are retried. Read timeouts are retried
/// until `deadline` passes, then reported as [`io::ErrorKind::TimedOut`];
/// without a deadline they are retried forever.
pub fn read_full<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    deadline: Option<Instant>,
) -> io::Result<usize> {
    let mut total = 0;

    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) =>
            {
                if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("received {} of {} bytes", total, buf.len()),
                    ));
                }
            }
            Err(e) => return Err(e),
        }
    }

    Ok(total)
}
