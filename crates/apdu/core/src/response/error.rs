//! Error types specific to APDU responses
//!
//! [`StatusKind`] is the shared status-to-error translation used by every
//! driver in the workspace, modelled on the ISO 7816-4 interindustry table.

use std::fmt;

use super::status::StatusWord;

/// Classification of a non-success status word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Part of the returned data may be corrupted (62 81)
    CorruptedData,
    /// End of file reached before reading Le bytes (62 82)
    FileEndReached,
    /// Verification failed, `n` tries left (63 Cn)
    PinCodeIncorrect {
        /// Remaining retries
        tries_left: u8,
    },
    /// Memory failure (65 81)
    MemoryFailure,
    /// Wrong length (67 00)
    WrongLength,
    /// Logical channel or secure messaging not supported (68 81, 68 82)
    NoCardSupport,
    /// Command incompatible with file structure (69 81)
    IncompatibleFileStructure,
    /// Security status not satisfied (69 82)
    SecurityStatusNotSatisfied,
    /// Authentication method blocked (69 83)
    AuthMethodBlocked,
    /// Conditions of use not satisfied, or referenced data invalidated (69 84, 69 85)
    ConditionsNotSatisfied,
    /// Command not allowed (69 86)
    NotAllowed,
    /// Secure messaging data objects missing or incorrect (69 87, 69 88)
    SecureMessaging,
    /// Incorrect parameters in the data field (6A 80)
    IncorrectData,
    /// Function not supported (6A 81)
    FunctionNotSupported,
    /// File not found (6A 82)
    FileNotFound,
    /// Record not found (6A 83)
    RecordNotFound,
    /// Not enough memory space in the file (6A 84)
    NotEnoughMemory,
    /// Incorrect parameters P1-P2 (6A 86, 6B 00, 6A 87)
    IncorrectParameters,
    /// Referenced data not found (6A 88)
    DataObjectNotFound,
    /// Wrong Le field, `available` bytes can be returned (6C XX)
    WrongLe {
        /// Length the card offers
        available: u8,
    },
    /// Instruction code not supported or invalid (6D 00)
    InsNotSupported,
    /// Class not supported (6E 00)
    ClassNotSupported,
    /// Any other status word
    CardCommandFailed,
}

impl StatusKind {
    /// Classify a status word; `90 00` is classified as a generic failure since
    /// callers only translate non-success status words
    pub const fn from_status(status: StatusWord) -> Self {
        match (status.sw1, status.sw2) {
            (0x62, 0x81) => Self::CorruptedData,
            (0x62, 0x82) => Self::FileEndReached,
            (0x63, n) if (n & 0xF0) == 0xC0 => Self::PinCodeIncorrect {
                tries_left: n & 0x0F,
            },
            (0x65, 0x81) => Self::MemoryFailure,
            (0x67, 0x00) => Self::WrongLength,
            (0x68, 0x81) | (0x68, 0x82) => Self::NoCardSupport,
            (0x69, 0x81) => Self::IncompatibleFileStructure,
            (0x69, 0x82) => Self::SecurityStatusNotSatisfied,
            (0x69, 0x83) => Self::AuthMethodBlocked,
            (0x69, 0x84) | (0x69, 0x85) => Self::ConditionsNotSatisfied,
            (0x69, 0x86) => Self::NotAllowed,
            (0x69, 0x87) | (0x69, 0x88) => Self::SecureMessaging,
            (0x6A, 0x80) => Self::IncorrectData,
            (0x6A, 0x81) => Self::FunctionNotSupported,
            (0x6A, 0x82) => Self::FileNotFound,
            (0x6A, 0x83) => Self::RecordNotFound,
            (0x6A, 0x84) => Self::NotEnoughMemory,
            (0x6A, 0x86) | (0x6A, 0x87) | (0x6B, 0x00) => Self::IncorrectParameters,
            (0x6A, 0x88) => Self::DataObjectNotFound,
            (0x6C, available) => Self::WrongLe { available },
            (0x6D, 0x00) => Self::InsNotSupported,
            (0x6E, 0x00) => Self::ClassNotSupported,
            _ => Self::CardCommandFailed,
        }
    }
}

/// Error for status words in APDU responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
    /// Classification of the status word
    pub kind: StatusKind,
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Card returned status {}: {}",
            self.status,
            self.status.description()
        )
    }
}

impl StatusError {
    /// Create a new status error
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self::from_status(StatusWord::new(sw1, sw2))
    }

    /// Create a status error from a status word
    pub const fn from_status(status: StatusWord) -> Self {
        Self {
            status,
            kind: StatusKind::from_status(status),
        }
    }
}

impl From<StatusWord> for StatusError {
    fn from(status: StatusWord) -> Self {
        Self::from_status(status)
    }
}

/// Error for APDU response processing
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// Incomplete response (less than 2 bytes)
    #[error("Incomplete response")]
    Incomplete,

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kind_mapping() {
        let cases = [
            (0x6281, StatusKind::CorruptedData),
            (0x6282, StatusKind::FileEndReached),
            (0x63C2, StatusKind::PinCodeIncorrect { tries_left: 2 }),
            (0x6700, StatusKind::WrongLength),
            (0x6982, StatusKind::SecurityStatusNotSatisfied),
            (0x6983, StatusKind::AuthMethodBlocked),
            (0x6986, StatusKind::NotAllowed),
            (0x6A82, StatusKind::FileNotFound),
            (0x6B00, StatusKind::IncorrectParameters),
            (0x6A88, StatusKind::DataObjectNotFound),
            (0x6C06, StatusKind::WrongLe { available: 6 }),
            (0x6D00, StatusKind::InsNotSupported),
            (0x6E00, StatusKind::ClassNotSupported),
            (0x6F00, StatusKind::CardCommandFailed),
            (0x6300, StatusKind::CardCommandFailed),
        ];

        for (sw, kind) in cases {
            assert_eq!(StatusKind::from_status(StatusWord::from_u16(sw)), kind, "{sw:04X}");
        }
    }

    #[test]
    fn test_status_error_display() {
        let err = StatusError::new(0x69, 0x82);
        assert_eq!(
            err.to_string(),
            "Card returned status 69 82: Security status not satisfied"
        );
    }
}
