//! Card serial number

use std::fmt;

use apolloos_iso7816::Error;

use crate::constants::SERIAL_LEN;

/// The 16 byte serial number of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialNumber([u8; SERIAL_LEN]);

impl SerialNumber {
    /// Create a serial number from its bytes
    pub const fn new(bytes: [u8; SERIAL_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub const fn as_bytes(&self) -> &[u8; SERIAL_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for SerialNumber {
    type Error = Error;

    /// Take the serial number from the start of a GET DATA response
    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        data.get(..SERIAL_LEN)
            .and_then(|bytes| bytes.try_into().ok())
            .map(Self)
            .ok_or(Error::InvalidData("serial number shorter than 16 bytes"))
    }
}

impl AsRef<[u8]> for SerialNumber {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<SerialNumber> for Vec<u8> {
    fn from(serial: SerialNumber) -> Self {
        serial.0.to_vec()
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}
