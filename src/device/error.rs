//! Device communication error types

use crate::device::protocol::Phase;
use thiserror::Error;

/// Errors that can occur while talking to the monitor
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The serial port could not be opened
    #[error("Cannot open serial device {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// The monitor did not acknowledge the handshake
    #[error("Handshake failed (received {received:?})")]
    HandshakeFailed { received: Option<u8> },

    /// The record counter could not be read
    #[error("No measurement found")]
    NoMeasurementsFound,

    /// Reading or writing the channel failed
    #[error("Channel I/O error: {0}")]
    ChannelIo(#[from] std::io::Error),

    /// The monitor stopped answering
    #[error("Timed out waiting for the device during {phase}")]
    Timeout { phase: Phase },
}

/// Result type alias for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;
