//! Yaesu FT-991A CAT client.
//!
//! This crate drives an FT-991A over its CAT (Computer Aided Transceiver)
//! serial interface. It provides:
//!
//! - **Protocol codec** ([`protocol`]) -- encode semicolon-terminated CAT
//!   commands and split replies into command code and parameter.
//! - **Command builders** ([`commands`]) -- construct the frequency, memory,
//!   mode, menu and clock commands and parse their replies.
//! - **Value types** ([`types`], [`memory`]) -- VFOs, operating modes,
//!   display colours, memory channel records and the radio clock.
//! - **Client** ([`client`]) -- [`Ft991a`], which opens the port, runs one
//!   command and closes the port again for every operation.
//! - **Builder** ([`builder`]) -- [`Ft991aBuilder`] for port, baud rate and
//!   timeout settings.
//!
//! # Example
//!
//! ```no_run
//! use catsu::{Ft991aBuilder, OperatingMode, Vfo};
//!
//! # async fn example() -> catsu::Result<()> {
//! let radio = Ft991aBuilder::new().serial_port("/dev/ttyUSB0").build()?;
//!
//! radio.set_frequency_human_readable(Vfo::A, "14.074M").await?;
//! radio.set_operating_mode(OperatingMode::DataUsb).await?;
//! println!("VFO-A: {} Hz", radio.read_vfo_a().await?);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod commands;
pub mod memory;
pub mod protocol;
pub mod types;

pub use builder::Ft991aBuilder;
pub use client::Ft991a;
pub use memory::MemoryChannelRecord;
pub use protocol::ParsedResponse;
pub use types::{DateTimeRecord, DisplayColour, OperatingMode, Vfo};

pub use catsu_core::{ConnectionConfig, Connector, Error, Result, Transport};
