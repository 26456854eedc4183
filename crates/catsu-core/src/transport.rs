//! Transport traits for radio communication.
//!
//! The [`Transport`] trait abstracts over one open link to the transceiver.
//! The [`Connector`] trait opens a fresh [`Transport`] from a
//! [`ConnectionConfig`]; the client calls it once per operation and closes
//! the transport before returning.
//!
//! The serial implementation lives in `catsu-transport`; mock implementations
//! for tests live in `catsu-test-harness`.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Serial connection parameters for one radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Serial port path (e.g. `/dev/ttyUSB0` on Linux, `COM3` on Windows).
    pub port: String,
    /// Baud rate as set in the radio's CAT RATE menu.
    pub baud_rate: u32,
}

impl ConnectionConfig {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        ConnectionConfig {
            port: port.into(),
            baud_rate,
        }
    }
}

/// Asynchronous byte-level transport to a radio.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the radio.
    ///
    /// Implementations should not return until all bytes have been handed
    /// to the underlying device.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the radio into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Will wait up to `timeout`
    /// for data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if no data is received within the deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}

/// Opens transports on demand.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open and configure a new connection described by `config`.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>>;
}
