//! Error type for the file protocol and card drivers

use apolloos_apdu_core::StatusKind;
use iso7816_tlv::TlvError;

/// Result type for file protocol and driver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the file protocol and card drivers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command exchange failed or the card rejected the command
    #[error(transparent)]
    Apdu(#[from] apolloos_apdu_core::Error),

    /// Caller supplied arguments the operation cannot honour
    #[error("Invalid arguments: {0}")]
    InvalidArguments(&'static str),

    /// The card returned data that cannot be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(&'static str),

    /// Malformed BER-TLV data
    #[error("TlvError: {0}")]
    Tlv(TlvError),

    /// Operation not supported by this driver
    #[error("Not supported")]
    NotSupported,

    /// The card in the reader is not handled by this driver
    #[error("Card not handled by driver {0}")]
    CardNotMatched(&'static str),
}

impl From<TlvError> for Error {
    fn from(error: TlvError) -> Self {
        Self::Tlv(error)
    }
}

impl From<apolloos_apdu_core::StatusError> for Error {
    fn from(error: apolloos_apdu_core::StatusError) -> Self {
        Self::Apdu(error.into())
    }
}

impl Error {
    /// The translated card status, if the card rejected the command
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            Self::Apdu(e) => e.status_kind(),
            _ => None,
        }
    }

    /// Whether the command exchange itself failed
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Apdu(e) if e.is_transport())
    }
}
