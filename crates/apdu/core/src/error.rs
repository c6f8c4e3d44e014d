//! Core error type for all APDU exchanges
//!
//! Transport failures, malformed responses and card-reported status errors are
//! kept apart so that callers can tell a broken link from a card that said no.

use crate::response::error::{ResponseError, StatusError, StatusKind};
use crate::transport::TransportError;

/// Result type for APDU exchanges
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The exchange itself could not complete
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The card answered with bytes that are not a valid response
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The card rejected the command
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Invalid command length
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),

    /// Too many chained GET RESPONSE exchanges
    #[error("Chain limit exceeded")]
    ChainLimitExceeded,

    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers and return the underlying error
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// The card status classification, if the card reported an error
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self.root() {
            Self::Status(status) => Some(status.kind),
            _ => None,
        }
    }

    /// Whether the exchange failed below the card (link, reader, driver)
    pub fn is_transport(&self) -> bool {
        matches!(self.root(), Self::Transport(_))
    }
}

/// Extension trait for Result with APDU Errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
