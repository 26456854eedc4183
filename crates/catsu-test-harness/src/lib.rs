//! catsu-test-harness: mock transports for testing the catsu client.
//!
//! [`MockConnector`] scripts the radio's side of every connection the client
//! opens and records what was written, so tests can check wire bytes and
//! connection lifecycle without hardware.

pub mod mock_serial;

pub use mock_serial::{MockConnector, MockTransport};
