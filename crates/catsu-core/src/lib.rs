//! catsu-core: error definitions and transport traits for catsu.
//!
//! The protocol client in the `catsu` crate depends only on these types, so
//! it can run against a real serial port or a scripted mock without change.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`Connector`] -- opens a [`Transport`] for one operation
//! - [`ConnectionConfig`] -- port and baud rate
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod transport;

pub use error::{Error, Result};
pub use transport::{ConnectionConfig, Connector, Transport};
