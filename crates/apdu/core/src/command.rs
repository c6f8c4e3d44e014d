//! APDU command definitions
//!
//! Short APDU commands according to ISO/IEC 7816-4. Extended length encoding is
//! not supported; the cards this workspace targets never exceed 255 bytes.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::Error;

/// Expected length type for APDU commands (`0x00` encodes 256)
pub type ExpectedLength = u8;

/// Longest data field a short APDU can carry
pub const MAX_DATA_LEN: usize = 255;

/// Generic APDU command structure
#[derive(Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: None,
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Number of response bytes the command asks for, `0x00` meaning 256
    pub fn expected_response_len(&self) -> Option<usize> {
        self.le.map(|le| if le == 0 { 256 } else { le as usize })
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;
        if let Some(data) = &self.data {
            length += 1 + data.len();
        }
        if self.le.is_some() {
            length += 1;
        }
        length
    }

    /// Check that the command fits a short APDU
    pub fn validate(&self) -> Result<(), Error> {
        match &self.data {
            Some(data) if data.is_empty() || data.len() > MAX_DATA_LEN => {
                Err(Error::InvalidCommandLength(self.command_length()))
            }
            _ => Ok(()),
        }
    }

    /// Convert to raw APDU bytes
    ///
    /// Lc is only meaningful for commands that pass [`Command::validate`].
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        if let Some(data) = &self.data {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        if data.len() == 5 {
            // Only Le present, no data
            command.le = Some(data[4]);
        } else if data.len() > 5 {
            let lc = data[4] as usize;
            if lc == 0 || data.len() < 5 + lc {
                return Err(Error::InvalidCommandLength(data.len()));
            }
            command.data = Some(Bytes::copy_from_slice(&data[5..5 + lc]));

            match data.len() - (5 + lc) {
                0 => {}
                1 => command.le = Some(data[5 + lc]),
                _ => return Err(Error::InvalidCommandLength(data.len())),
            }
        }

        Ok(command)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("cla", &format!("{:#04x}", self.cla))
            .field("ins", &format!("{:#04x}", self.ins))
            .field("p1", &format!("{:#04x}", self.p1))
            .field("p2", &format!("{:#04x}", self.p2))
            .field("data", &self.data.as_ref().map(hex::encode))
            .field("le", &self.le)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_command_serialization() {
        let cmd = Command::new_with_data(0x00, 0xA4, 0x08, 0x00, hex!("50005001").to_vec())
            .with_le(0x00);
        assert_eq!(cmd.to_bytes().as_ref(), hex!("00A40800045000500100"));

        let cmd = Command::new_with_le(0x00, 0xB0, 0x00, 0x10, 0x06);
        assert_eq!(cmd.to_bytes().as_ref(), hex!("00B0001006"));
    }

    #[test]
    fn test_command_length() {
        assert_eq!(Command::new(0x00, 0xB0, 0x00, 0x00).command_length(), 4);
        assert_eq!(
            Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0xFF).command_length(),
            5
        );

        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let cmd = Command::new_with_data(0x00, 0xD6, 0x00, 0x00, data);
        assert_eq!(cmd.command_length(), 8);
        assert_eq!(cmd.with_le(0xFF).command_length(), 9);
    }

    #[test]
    fn test_expected_response_len() {
        assert_eq!(
            Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0x00).expected_response_len(),
            Some(256)
        );
        assert_eq!(
            Command::new_with_le(0x00, 0xCA, 0x01, 0x01, 0x20).expected_response_len(),
            Some(32)
        );
        assert_eq!(Command::new(0x00, 0xA4, 0x00, 0x0C).expected_response_len(), None);
    }

    #[test]
    fn test_command_from_bytes() {
        let cmd = Command::from_bytes(&hex!("00A40400")).unwrap();
        assert_eq!(cmd, Command::new(0x00, 0xA4, 0x04, 0x00));

        let cmd = Command::from_bytes(&hex!("00A4040003010203")).unwrap();
        assert_eq!(cmd.data.as_deref(), Some(&[0x01, 0x02, 0x03][..]));
        assert!(cmd.le.is_none());

        let cmd = Command::from_bytes(&hex!("00A4040003010203FF")).unwrap();
        assert_eq!(cmd.le, Some(0xFF));

        let cmd = Command::from_bytes(&hex!("00B0000000")).unwrap();
        assert!(cmd.data.is_none());
        assert_eq!(cmd.le, Some(0));

        assert!(matches!(
            Command::from_bytes(&hex!("00B000")),
            Err(Error::InvalidCommandLength(3))
        ));
        assert!(Command::from_bytes(&hex!("00A404000501")).is_err());
    }

    #[test]
    fn test_command_validate() {
        assert!(Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0x00).validate().is_ok());
        assert!(
            Command::new_with_data(0x00, 0xD6, 0x00, 0x00, vec![0xAA; MAX_DATA_LEN])
                .validate()
                .is_ok()
        );

        let cmd = Command::new_with_data(0x00, 0xA4, 0x08, 0x00, vec![0x50; 258]).with_le(0x00);
        assert!(matches!(cmd.validate(), Err(Error::InvalidCommandLength(264))));

        let cmd = Command::new_with_data(0x00, 0xA4, 0x08, 0x00, Vec::new());
        assert!(cmd.validate().is_err());
    }
}
