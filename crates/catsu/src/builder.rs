//! Ft991aBuilder -- fluent builder for [`Ft991a`] clients.
//!
//! Building performs no I/O; the serial port is first opened by the first
//! operation.
//!
//! # Example
//!
//! ```
//! use catsu::Ft991aBuilder;
//! use std::time::Duration;
//!
//! let radio = Ft991aBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .baud_rate(38_400)
//!     .read_timeout(Duration::from_millis(300))
//!     .build()
//!     .unwrap();
//! assert_eq!(radio.connection_config().port, "/dev/ttyUSB0");
//! ```

use std::sync::Arc;
use std::time::Duration;

use catsu_core::error::{Error, Result};
use catsu_core::transport::{ConnectionConfig, Connector};
use catsu_transport::SerialConnector;

use crate::client::Ft991a;

/// Fluent builder for [`Ft991a`].
pub struct Ft991aBuilder {
    serial_port: Option<String>,
    baud_rate: u32,
    read_timeout: Duration,
    max_response_len: usize,
}

impl Ft991aBuilder {
    /// The FT-991A's factory CAT rate.
    pub const DEFAULT_BAUD_RATE: u32 = 38_400;

    /// Create a builder with default settings:
    /// - baud_rate: 38400
    /// - read_timeout: 500ms per byte
    /// - max_response_len: 128 bytes
    pub fn new() -> Self {
        Ft991aBuilder {
            serial_port: None,
            baud_rate: Self::DEFAULT_BAUD_RATE,
            read_timeout: Ft991a::DEFAULT_READ_TIMEOUT,
            max_response_len: Ft991a::DEFAULT_MAX_RESPONSE_LEN,
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM3`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Must match the radio's CAT RATE menu setting.
    pub fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }

    /// How long to wait for each byte of a reply (default: 500ms).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Longest reply accepted before giving up on the terminator
    /// (default: 128 bytes).
    pub fn max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = len;
        self
    }

    /// Build an [`Ft991a`] that talks over the serial port.
    ///
    /// Requires that [`serial_port()`](Self::serial_port) has been called.
    pub fn build(self) -> Result<Ft991a> {
        self.build_with_connector(SerialConnector::new())
    }

    /// Build an [`Ft991a`] that opens its connections through `connector`.
    ///
    /// Used with a mock connector in tests, or with a serial connector
    /// carrying non-default line settings.
    pub fn build_with_connector(self, connector: impl Connector + 'static) -> Result<Ft991a> {
        let port = self
            .serial_port
            .ok_or_else(|| Error::InvalidArgument("serial port is required".into()))?;
        if self.baud_rate == 0 {
            return Err(Error::InvalidArgument("baud rate must be non-zero".into()));
        }
        if self.max_response_len == 0 {
            return Err(Error::InvalidArgument(
                "max response length must be non-zero".into(),
            ));
        }

        Ok(Ft991a::with_connector(
            ConnectionConfig::new(port, self.baud_rate),
            Arc::new(connector),
            self.read_timeout,
            self.max_response_len,
        ))
    }
}

impl Default for Ft991aBuilder {
    fn default() -> Self {
        Self::new()
    }
}
