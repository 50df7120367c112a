//! BM65 request/response protocol
//!
//! Every exchange writes a short request and then reads a fixed-size reply.
//!
//! ```text
//! Phase            Request        Reply
//! ---------------  -------------  ---------------------------
//! Handshake        AA             1 byte, 55 = ready
//! Description      A4             32 bytes of device metadata
//! Count            A2             1 byte, number of records N
//! Record i (1..N)  A3 i           9 bytes, see decode_record
//! ```
//!
//! The exchange is strictly sequential and never retried: any failure ends
//! the fetch and discards whatever was read so far.

use crate::device::channel::{open_serial, read_full, SerialSettings};
use crate::device::error::{DeviceError, DeviceResult};
use crate::storage::{merge, Measurement};
use std::fmt;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

pub const HANDSHAKE_REQUEST: u8 = 0xAA;
pub const HANDSHAKE_ACK: u8 = 0x55;
pub const DESCRIPTION_REQUEST: u8 = 0xA4;
pub const COUNT_REQUEST: u8 = 0xA2;
pub const RECORD_REQUEST: u8 = 0xA3;

pub const DESCRIPTION_LEN: usize = 32;
pub const RECORD_LEN: usize = 9;

/// Offsets applied by the device to save space in a byte
const PRESSURE_OFFSET: i32 = 25;
const YEAR_OFFSET: i32 = 2000;

/// Where the client is in the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Handshaking,
    DescribingDevice,
    Counting,
    /// Fetching the record with this 1-based device index
    FetchingRecords(u8),
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Handshaking => write!(f, "handshake"),
            Phase::DescribingDevice => write!(f, "device description"),
            Phase::Counting => write!(f, "counting"),
            Phase::FetchingRecords(index) => write!(f, "record {}", index),
            Phase::Closed => write!(f, "closed"),
        }
    }
}

/// Decode a 9-byte record reply
pub fn decode_record(raw: &[u8; RECORD_LEN]) -> Measurement {
    Measurement {
        header: i32::from(raw[0]),
        systolic: i32::from(raw[1]) + PRESSURE_OFFSET,
        diastolic: i32::from(raw[2]) + PRESSURE_OFFSET,
        pulse: i32::from(raw[3]),
        month: i32::from(raw[4]),
        day: i32::from(raw[5]),
        hour: i32::from(raw[6]),
        minute: i32::from(raw[7]),
        year: i32::from(raw[8]) + YEAR_OFFSET,
    }
}

/// Protocol client owning the channel for one fetch
///
/// [`DeviceClient::fetch`] consumes the client, so the channel is closed
/// exactly once whichever phase fails.
pub struct DeviceClient<C> {
    channel: C,
    read_timeout: Option<Duration>,
    phase: Phase,
}

impl<C: Read + Write> DeviceClient<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            read_timeout: None,
            phase: Phase::Idle,
        }
    }

    /// Fail when a reply does not arrive within `timeout`
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the whole exchange and return the stored measurements, latest first
    pub fn fetch(mut self) -> DeviceResult<Vec<Measurement>> {
        let result = self.run();
        let failed_in = self.phase;
        self.phase = Phase::Closed;
        drop(self.channel);

        match result {
            Ok(items) => {
                tracing::debug!("Device channel closed");
                Ok(merge(&items, &[]))
            }
            Err(e) => {
                tracing::warn!(phase = %failed_in, error = %e, "Device fetch aborted");
                Err(e)
            }
        }
    }

    fn run(&mut self) -> DeviceResult<Vec<Measurement>> {
        self.handshake()?;
        self.describe()?;
        let count = self.count()?;

        let mut items = Vec::with_capacity(usize::from(count));
        for index in 1..=count {
            items.push(self.fetch_record(index)?);
        }

        tracing::info!(count = items.len(), "Fetched measurements from device");
        Ok(items)
    }

    fn handshake(&mut self) -> DeviceResult<()> {
        self.phase = Phase::Handshaking;
        tracing::info!("Starting handshake...");

        let mut reply = [0u8; 1];
        let received = match self.exchange(&[HANDSHAKE_REQUEST], &mut reply) {
            Ok(1) => Some(reply[0]),
            Ok(_) => None,
            Err(DeviceError::ChannelIo(e)) => {
                tracing::warn!(error = %e, "Channel error during handshake");
                None
            }
            Err(e) => return Err(e),
        };

        if received != Some(HANDSHAKE_ACK) {
            return Err(DeviceError::HandshakeFailed { received });
        }

        tracing::info!("Handshake successful.");
        Ok(())
    }

    fn describe(&mut self) -> DeviceResult<()> {
        self.phase = Phase::DescribingDevice;
        tracing::info!("Requesting device description...");

        let mut reply = [0u8; DESCRIPTION_LEN];
        self.exchange_exact(&[DESCRIPTION_REQUEST], &mut reply)?;

        tracing::info!(
            description = %String::from_utf8_lossy(&reply).trim_end_matches('\0'),
            "Device description"
        );
        Ok(())
    }

    fn count(&mut self) -> DeviceResult<u8> {
        self.phase = Phase::Counting;
        tracing::info!("Requesting data counter...");

        let mut reply = [0u8; 1];
        if self.exchange(&[COUNT_REQUEST], &mut reply)? == 0 {
            return Err(DeviceError::NoMeasurementsFound);
        }

        tracing::info!("{} item(s) available.", reply[0]);
        Ok(reply[0])
    }

    fn fetch_record(&mut self, index: u8) -> DeviceResult<Measurement> {
        self.phase = Phase::FetchingRecords(index);

        let mut reply = [0u8; RECORD_LEN];
        self.exchange_exact(&[RECORD_REQUEST, index], &mut reply)?;

        let m = decode_record(&reply);
        tracing::debug!(
            index,
            timestamp = %m.timestamp_label(),
            systolic = m.systolic,
            diastolic = m.diastolic,
            pulse = m.pulse,
            "Decoded record"
        );
        Ok(m)
    }

    /// Write `request`, then read until `reply` is full or the stream ends
    fn exchange(&mut self, request: &[u8], reply: &mut [u8]) -> DeviceResult<usize> {
        self.channel.write_all(request)?;
        self.channel.flush()?;

        let deadline = self.read_timeout.map(|timeout| Instant::now() + timeout);
        read_full(&mut self.channel, reply, deadline).map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut => DeviceError::Timeout { phase: self.phase },
            _ => DeviceError::ChannelIo(e),
        })
    }

    /// Like [`exchange`](Self::exchange), but a short reply is an error
    fn exchange_exact(&mut self, request: &[u8], reply: &mut [u8]) -> DeviceResult<()> {
        let n = self.exchange(request, reply)?;
        if n < reply.len() {
            return Err(DeviceError::ChannelIo(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{}: received {} of {} bytes", self.phase, n, reply.len()),
            )));
        }
        Ok(())
    }
}

/// Open the serial device, fetch every stored measurement and close it
pub fn fetch_from_device(settings: &SerialSettings) -> DeviceResult<Vec<Measurement>> {
    let port = open_serial(settings)?;
    DeviceClient::new(port)
        .with_read_timeout(settings.read_timeout)
        .fetch()
}
