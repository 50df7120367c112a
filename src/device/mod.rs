//! Beurer BM65 device access
//!
//! - **channel**: Serial port setup and exact-length reads
//! - **protocol**: The handshake / description / count / records exchange
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use bm65::device::{fetch_from_device, SerialSettings};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = SerialSettings::new("/dev/ttyUSB0")
//!         .read_timeout(Some(Duration::from_secs(10)));
//!
//!     let items = fetch_from_device(&settings)?;
//!     println!("{} measurement(s) on the device", items.len());
//!
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod protocol;

pub use channel::{open_serial, read_full, SerialSettings, DEFAULT_BAUD_RATE};
pub use error::{DeviceError, DeviceResult};
pub use protocol::{decode_record, fetch_from_device, DeviceClient, Phase};
