//! Transport implementations for catsu.
//!
//! Provides [`SerialTransport`], the [`Transport`](catsu_core::Transport)
//! implementation for the FT-991A's USB virtual COM port or an RS-232 link,
//! and [`SerialConnector`], which the client uses to open one per operation.
//!
//! # Example
//!
//! ```no_run
//! use catsu_core::{ConnectionConfig, Connector};
//! use catsu_transport::SerialConnector;
//!
//! # async fn example() -> catsu_core::Result<()> {
//! let connector = SerialConnector::new();
//! let mut transport = connector
//!     .connect(&ConnectionConfig::new("/dev/ttyUSB0", 38400))
//!     .await?;
//! transport.send(b"AM;").await?;
//! transport.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod serial;

pub use serial::{DataBits, FlowControl, Parity, SerialConfig, SerialConnector, SerialTransport, StopBits};
