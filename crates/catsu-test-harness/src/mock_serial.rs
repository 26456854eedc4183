//! Mock transport for deterministic testing of the CAT client.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs. [`MockConnector`] hands out `MockTransport`s that
//! share one script and one log, so a test can follow the client across the
//! fresh connection it opens for every operation and check what was written,
//! how many connections were opened, and whether each one was closed.
//!
//! # Example
//!
//! ```
//! use catsu_test_harness::MockConnector;
//!
//! let mock = MockConnector::new();
//! // When the client sends "FA;", reply with the VFO-A frequency.
//! mock.expect(b"FA;", b"FA014250000;");
//! // "AM;" gets no reply.
//! mock.expect_send(b"AM;");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use catsu_core::error::{Error, Result};
use catsu_core::transport::{ConnectionConfig, Connector, Transport};

/// A pre-loaded request/response pair.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// The bytes to return once the matching request is received.
    response: Vec<u8>,
}

/// Script and log shared by every transport handed out by one connector.
#[derive(Debug, Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    /// Reply bytes not yet returned by `receive()`.
    pending_response: VecDeque<u8>,
    sent_log: Vec<Vec<u8>>,
    connects: usize,
    closes: usize,
    failed_connects: usize,
    fail_next_send: bool,
    last_config: Option<ConnectionConfig>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().expect("mock transport state poisoned")
}

/// A mock [`Transport`] for testing without hardware.
///
/// Expectations are consumed in order. When `send()` is called, the sent
/// data is recorded and matched against the next expectation. The
/// corresponding response is then returned by subsequent `receive()` calls,
/// as many bytes per call as the buffer holds. Once the response is used up
/// `receive()` returns [`Error::Timeout`].
#[derive(Debug)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    connected: bool,
}

impl MockTransport {
    /// Create a standalone mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            state: Arc::new(Mutex::new(MockState::default())),
            connected: true,
        }
    }

    /// Add an expected request/response pair.
    pub fn expect(&self, request: &[u8], response: &[u8]) {
        lock(&self.state).expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// All data sent through this transport, one element per `send()`.
    pub fn sent_data(&self) -> Vec<Vec<u8>> {
        lock(&self.state).sent_log.clone()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining_expectations(&self) -> usize {
        lock(&self.state).expectations.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        let mut state = lock(&self.state);

        if state.fail_next_send {
            state.fail_next_send = false;
            return Err(Error::ConnectionLost);
        }

        state.sent_log.push(data.to_vec());

        match state.expectations.pop_front() {
            Some(expectation) => {
                if data != expectation.request.as_slice() {
                    return Err(Error::Transport(format!(
                        "mock: unexpected send data: expected {:?}, got {:?}",
                        String::from_utf8_lossy(&expectation.request),
                        String::from_utf8_lossy(data)
                    )));
                }
                state.pending_response = expectation.response.into();
                Ok(())
            }
            None => Err(Error::Transport(format!(
                "mock: no more expectations, got {:?}",
                String::from_utf8_lossy(data)
            ))),
        }
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        let mut state = lock(&self.state);

        if state.pending_response.is_empty() {
            return Err(Error::Timeout);
        }
        let n = state.pending_response.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(state.pending_response.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    async fn close(&mut self) -> Result<()> {
        if self.connected {
            self.connected = false;
            let mut state = lock(&self.state);
            state.closes += 1;
            state.pending_response.clear();
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// A [`Connector`] handing out [`MockTransport`]s over one shared script.
///
/// Cloning a `MockConnector` shares the script, so a test can keep one
/// handle for assertions while the client owns the other.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expected request and the reply the radio sends back.
    pub fn expect(&self, request: &[u8], response: &[u8]) {
        lock(&self.state).expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// Add an expected request that the radio does not answer.
    pub fn expect_send(&self, request: &[u8]) {
        self.expect(request, b"");
    }

    /// Make the next `connect()` fail as if the port were unavailable.
    pub fn fail_next_connect(&self) {
        lock(&self.state).failed_connects += 1;
    }

    /// Make the next `send()` fail as if the cable had been pulled.
    pub fn fail_next_send(&self) {
        lock(&self.state).fail_next_send = true;
    }

    /// All data written, one element per `send()`, across all connections.
    pub fn sent_data(&self) -> Vec<Vec<u8>> {
        lock(&self.state).sent_log.clone()
    }

    /// All data written, decoded as ASCII strings.
    pub fn sent_commands(&self) -> Vec<String> {
        lock(&self.state)
            .sent_log
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining_expectations(&self) -> usize {
        lock(&self.state).expectations.len()
    }

    /// Number of successful `connect()` calls.
    pub fn connect_count(&self) -> usize {
        lock(&self.state).connects
    }

    /// Number of transports that have been closed.
    pub fn close_count(&self) -> usize {
        lock(&self.state).closes
    }

    /// The configuration passed to the most recent `connect()` call.
    pub fn last_config(&self) -> Option<ConnectionConfig> {
        lock(&self.state).last_config.clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>> {
        let mut state = lock(&self.state);
        state.last_config = Some(config.clone());
        if state.failed_connects > 0 {
            state.failed_connects -= 1;
            return Err(Error::Transport(format!(
                "mock: cannot open {}",
                config.port
            )));
        }
        state.connects += 1;
        Ok(Box::new(MockTransport {
            state: Arc::clone(&self.state),
            connected: true,
        }))
    }
}
