//! Executor for APDU command execution
//!
//! An executor turns a [`Command`] into a [`Response`], applying the ISO 7816
//! transmission rules every card layer expects before it sees a response:
//! `6Cxx` resends the command with the exact Le, `61xx` fetches the remaining
//! data with GET RESPONSE.

use std::fmt;

use bytes::Bytes;
use tracing::{Level, debug, instrument, trace};

use crate::command::Command;
use crate::response::Response;
use crate::transport::CardTransport;
use crate::{Error, Result, ResultExt};

/// GET RESPONSE instruction
const INS_GET_RESPONSE: u8 = 0xC0;

/// Trait for APDU command execution
pub trait Executor: Send + fmt::Debug {
    /// Transmit a command and return the card's response
    ///
    /// A card status other than `90 00` is not an error here; the caller decides
    /// how to translate it. Errors are transport failures and malformed responses.
    #[instrument(level = "trace", skip(self), fields(executor = std::any::type_name::<Self>()))]
    fn transmit(&mut self, command: &Command) -> Result<Response> {
        let response = self.do_transmit(command);
        if let Ok(response) = &response {
            let status = response.status();
            if status.tracing_level() == Level::DEBUG {
                trace!(%status, len = response.payload().len(), "Command completed");
            } else {
                debug!(%status, reason = status.description(), "Card reported status");
            }
        }
        response
    }

    /// Internal implementation of transmit
    fn do_transmit(&mut self, command: &Command) -> Result<Response>;

    /// Reset the executor, including the transport
    fn reset(&mut self) -> Result<()>;
}

/// Card executor implementation on top of a raw transport
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
    /// Maximum number of chained GET RESPONSE exchanges
    max_chain: usize,
    /// The last raw response received
    last_response: Option<Bytes>,
}

impl<T: CardTransport> fmt::Debug for CardExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardExecutor")
            .field("transport", &self.transport)
            .field("max_chain", &self.max_chain)
            .field("last_response", &self.last_response.as_ref().map(hex::encode))
            .finish()
    }
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new card executor with the given transport
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            max_chain: 10,
            last_response: None,
        }
    }

    /// Set the maximum number of chained GET RESPONSE exchanges
    pub const fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Get the last raw response received
    pub const fn last_response(&self) -> Option<&Bytes> {
        self.last_response.as_ref()
    }

    fn exchange(&mut self, command: &Command) -> Result<Response> {
        command.validate()?;
        let raw = self
            .transport
            .transmit_raw(&command.to_bytes())
            .context("Transport error")?;
        let response = Response::from_bytes(&raw).context("Failed to parse response")?;
        self.last_response = Some(raw);
        Ok(response)
    }
}

impl<T: CardTransport> Executor for CardExecutor<T> {
    fn do_transmit(&mut self, command: &Command) -> Result<Response> {
        let mut response = self.exchange(command)?;

        if response.status().is_wrong_le() {
            let le = response.status().sw2;
            debug!(le, "Card asked for exact Le, resending");
            response = self.exchange(&command.clone().with_le(le))?;
        }

        let mut chain_count = 0;
        while let Some(remaining) = response.status().remaining_bytes() {
            if chain_count == self.max_chain {
                return Err(Error::ChainLimitExceeded);
            }
            trace!(remaining, "Fetching remaining response data");
            let get_response =
                Command::new_with_le(command.cla, INS_GET_RESPONSE, 0x00, 0x00, remaining);
            let next = self.exchange(&get_response)?;
            response.append(next);
            chain_count += 1;
        }

        Ok(response)
    }

    fn reset(&mut self) -> Result<()> {
        self.transport
            .reset()
            .context("Failed to reset transport")?;
        self.last_response = None;
        Ok(())
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn transmit(&mut self, command: &Command) -> Result<Response> {
        (**self).transmit(command)
    }

    fn do_transmit(&mut self, command: &Command) -> Result<Response> {
        (**self).do_transmit(command)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}
