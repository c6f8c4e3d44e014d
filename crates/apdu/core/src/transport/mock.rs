//! Scripted in-memory transport
//!
//! Responses are consumed in order, one per exchange. Every command sent is
//! recorded, and a [`MockLog`] handle keeps access to the script and the
//! recording after the transport has been moved into an executor.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use super::{CardTransport, TransportError};

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<Option<Bytes>>,
    commands: Vec<Bytes>,
}

/// Shared handle onto a [`MockTransport`] script and command log
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    state: Arc<Mutex<MockState>>,
}

impl MockLog {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue raw response bytes (payload followed by SW1 SW2)
    pub fn push_response(&self, response: impl Into<Bytes>) {
        self.lock().responses.push_back(Some(response.into()));
    }

    /// Queue a transmission failure for the next exchange
    pub fn push_failure(&self) {
        self.lock().responses.push_back(None);
    }

    /// All commands sent so far
    pub fn commands(&self) -> Vec<Bytes> {
        self.lock().commands.clone()
    }

    /// Number of commands sent so far
    pub fn command_count(&self) -> usize {
        self.lock().commands.len()
    }

    /// The last command sent, if any
    pub fn last_command(&self) -> Option<Bytes> {
        self.lock().commands.last().cloned()
    }

    /// Number of scripted responses not consumed yet
    pub fn pending(&self) -> usize {
        self.lock().responses.len()
    }

    /// Forget the recorded commands, keeping the script
    pub fn clear_commands(&self) {
        self.lock().commands.clear();
    }
}

/// Mock transport for testing
#[derive(Debug)]
pub struct MockTransport {
    log: MockLog,
    connected: bool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a connected mock transport with an empty script
    pub fn new() -> Self {
        Self {
            log: MockLog::default(),
            connected: true,
        }
    }

    /// Create a mock transport with the given responses queued
    pub fn with_responses<I, B>(responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let transport = Self::new();
        for response in responses {
            transport.log.push_response(response);
        }
        transport
    }

    /// Handle onto the script and the command log
    pub fn log(&self) -> MockLog {
        self.log.clone()
    }

    /// Simulate card removal
    pub const fn disconnect(&mut self) {
        self.connected = false;
    }
}

impl CardTransport for MockTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }

        let mut state = self.log.lock();
        state.commands.push(Bytes::copy_from_slice(command));
        state
            .responses
            .pop_front()
            .flatten()
            .ok_or(TransportError::Transmission)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_exchanges() {
        let mut transport = MockTransport::with_responses([vec![0x01u8, 0x90, 0x00]]);
        let log = transport.log();
        log.push_failure();

        let response = transport.transmit_raw(&[0x00, 0xB0, 0x00, 0x00, 0x01]).unwrap();
        assert_eq!(response.as_ref(), &[0x01, 0x90, 0x00]);

        assert!(matches!(
            transport.transmit_raw(&[0x00, 0xB0, 0x00, 0x01, 0x01]),
            Err(TransportError::Transmission)
        ));
        // empty script
        assert!(transport.transmit_raw(&[0x00, 0xB0, 0x00, 0x02, 0x01]).is_err());

        assert_eq!(log.command_count(), 3);
        assert_eq!(
            log.last_command().unwrap().as_ref(),
            &[0x00, 0xB0, 0x00, 0x02, 0x01]
        );
    }

    #[test]
    fn test_disconnected() {
        let mut transport = MockTransport::with_responses([vec![0x90u8, 0x00]]);
        transport.disconnect();
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.transmit_raw(&[0x00, 0xA4, 0x00, 0x0C]),
            Err(TransportError::Connection)
        ));
        assert_eq!(transport.log().command_count(), 0);

        transport.reset().unwrap();
        assert!(transport.transmit_raw(&[0x00, 0xA4, 0x00, 0x0C]).is_ok());
    }
}
