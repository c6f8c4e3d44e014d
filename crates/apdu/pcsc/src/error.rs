//! Error types for PC/SC transport

use apolloos_apdu_core::TransportError;

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(
                pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard | pcsc::Error::ResetCard,
            )
            | PcscError::NoCard(_) => Self::Connection,
            PcscError::Pcsc(pcsc::Error::Timeout) => Self::Timeout,
            PcscError::Pcsc(pcsc::Error::InsufficientBuffer) => Self::BufferTooSmall,
            PcscError::Pcsc(
                pcsc::Error::ReaderUnavailable
                | pcsc::Error::UnknownReader
                | pcsc::Error::NoReadersAvailable,
            )
            | PcscError::NoReadersAvailable
            | PcscError::ReaderNotFound(_) => Self::Device,
            PcscError::Pcsc(e) => Self::other(format!("PC/SC error: {e}")),
        }
    }
}
