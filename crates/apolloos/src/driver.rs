//! AppoloOS card driver
//!
//! The card answers SELECT with an FCI the generic decoder cannot get a size
//! from, and keeps a [`HEADER_LEN`] byte header in front of every EF. The
//! driver learns sizes by reading that header and shifts every content read
//! past it.

use apolloos_apdu_core::Executor;
use apolloos_iso7816::iso::{MAX_READ_OFFSET, check_read_args, copy_read_response};
use apolloos_iso7816::{
    AtrTable, CardCtl, CardCtlResponse, CardDriver, EfStructure, Error, File, FileOps, FileType,
    Iso7816, Path, Result,
};
use tracing::{debug, instrument, trace};

use crate::constants::{ATRS, HEADER_LEN, MAX_RECV_SIZE, SIZE_PROBE_LEN, serial_number};
use crate::serial::SerialNumber;
use crate::session::CardSession;

/// Driver for AppoloOS cards
#[derive(Debug)]
pub struct ApolloOs<E: Executor> {
    iso: Iso7816<E>,
    session: CardSession,
}

impl<E: Executor> ApolloOs<E> {
    /// Create a driver on top of an executor, without talking to the card
    pub const fn new(executor: E) -> Self {
        Self {
            iso: Iso7816::new(executor),
            session: CardSession::new(),
        }
    }

    /// Create a driver for the card with the given ATR and initialise it
    pub fn bind(executor: E, atr: &[u8]) -> Result<Self> {
        if !Self::match_card(atr) {
            return Err(Error::CardNotMatched(Self::SHORT_NAME));
        }
        let mut card = Self::new(executor);
        card.init()?;
        Ok(card)
    }

    /// Session state
    pub const fn session(&self) -> &CardSession {
        &self.session
    }

    /// Content size of the selected file, 0 when unknown
    pub const fn file_size(&self) -> usize {
        self.session.file_size
    }

    /// The generic protocol the driver delegates to
    pub const fn iso(&self) -> &Iso7816<E> {
        &self.iso
    }

    /// Take ownership of the executor
    pub fn into_executor(self) -> E {
        self.iso.into_executor()
    }

    /// Learn the content size of the selected file from its header
    ///
    /// Best effort: any failure yields 0.
    #[instrument(level = "debug", skip(self))]
    pub fn probe_file_size(&mut self) -> usize {
        let response = match self.iso.read_binary_raw(0, SIZE_PROBE_LEN) {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "Size probe failed");
                return 0;
            }
        };
        if !response.is_success() {
            debug!(status = %response.status(), "Size probe rejected");
            return 0;
        }

        match response.payload()[..] {
            [_, _, _, _, lo, hi, ..] => {
                let size = usize::from(u16::from_le_bytes([lo, hi]));
                trace!(size, header = %hex::encode(response.payload()), "File size");
                size
            }
            _ => {
                debug!(len = response.payload().len(), "Size probe response too short");
                0
            }
        }
    }

    /// The card serial number, fetched from the card on first use
    pub fn serial_number(&mut self) -> Result<SerialNumber> {
        if let Some(serial) = self.session.serial {
            return Ok(serial);
        }

        let data = self.iso.get_data(serial_number::P1, serial_number::P2, serial_number::LE)?;
        let serial = SerialNumber::try_from(&data[..])?;
        debug!(%serial, "Serial number");
        self.session.serial = Some(serial);
        Ok(serial)
    }
}

impl<E: Executor> FileOps for ApolloOs<E> {
    fn max_recv_size(&self) -> usize {
        self.iso.max_recv_size()
    }

    #[instrument(level = "debug", skip(self, path), fields(path = %path))]
    fn select_file(&mut self, path: &Path, want_file: bool) -> Result<Option<File>> {
        let fci = self.iso.select_raw(path, want_file)?;
        let file = if want_file {
            Some(self.process_fci(&fci)?.selected_by(path))
        } else {
            None
        };

        self.session.file_size = self.probe_file_size();
        Ok(file)
    }

    fn process_fci(&mut self, buf: &[u8]) -> Result<File> {
        let mut file = self.iso.process_fci(buf)?;
        if file.has_name() {
            file.file_type = FileType::Df;
            file.ef_structure = EfStructure::Unknown;
        } else {
            file.file_type = FileType::WorkingEf;
            file.ef_structure = EfStructure::Transparent;
            file.size = self.probe_file_size();
        }
        Ok(file)
    }

    #[instrument(level = "debug", skip(self, buf))]
    fn read_binary(&mut self, offset: usize, buf: &mut [u8], count: usize) -> Result<usize> {
        check_read_args(self.max_recv_size(), buf, count)?;

        let file_size = self.session.file_size;
        let count = if offset == 0 {
            count.min(file_size)
        } else if offset.saturating_add(count) > file_size {
            if offset >= file_size {
                trace!(file_size, "Read past end of file");
                return Ok(0);
            }
            file_size - offset
        } else {
            count
        };

        let card_offset = offset + HEADER_LEN;
        if card_offset > MAX_READ_OFFSET {
            return Err(Error::InvalidArguments("offset beyond READ BINARY range"));
        }

        let response = self.iso.read_binary_raw(card_offset as u16, count)?;
        copy_read_response(response, &mut buf[..count])
    }
}

impl<E: Executor> CardDriver for ApolloOs<E> {
    const NAME: &'static str = "Serbian EID";
    const SHORT_NAME: &'static str = "apolloos";

    fn atr_table() -> &'static AtrTable {
        ATRS
    }

    #[instrument(level = "debug", skip(self))]
    fn init(&mut self) -> Result<()> {
        self.iso.set_max_recv_size(MAX_RECV_SIZE);
        self.serial_number().map(|_| ())
    }

    fn card_ctl(&mut self, cmd: CardCtl) -> Result<CardCtlResponse> {
        match cmd {
            CardCtl::GetSerialNumber => Ok(CardCtlResponse::SerialNumber(
                self.serial_number()?.into(),
            )),
            _ => {
                debug!(?cmd, "Unsupported card control");
                Err(Error::NotSupported)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apolloos_apdu_core::{CardExecutor, MockTransport};
    use hex_literal::hex;

    fn card<I>(responses: I) -> ApolloOs<CardExecutor<MockTransport>>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        ApolloOs::new(CardExecutor::new(MockTransport::with_responses(responses)))
    }

    #[test]
    fn test_probe_file_size() {
        let mut card = card([
            hex!("0000000010009000").to_vec(),
            hex!("A1B2C3D434129000").to_vec(),
            // longer than requested, the size still sits at 4..6
            hex!("00000000FF01FFFF9000").to_vec(),
        ]);
        assert_eq!(card.probe_file_size(), 0x10);
        assert_eq!(card.probe_file_size(), 0x1234);
        assert_eq!(card.probe_file_size(), 0x01FF);
    }

    #[test]
    fn test_probe_failures_yield_zero() {
        let mut card = card([
            hex!("6982").to_vec(),
            hex!("0000000010006282").to_vec(),
            hex!("00009000").to_vec(),
        ]);
        assert_eq!(card.probe_file_size(), 0);
        assert_eq!(card.probe_file_size(), 0);
        assert_eq!(card.probe_file_size(), 0);
        // script exhausted, transport fails
        assert_eq!(card.probe_file_size(), 0);
    }

    #[test]
    fn test_match_card() {
        assert!(ApolloOs::<CardExecutor<MockTransport>>::match_card(&hex!(
            "3BB918008131FE9E8073FF614083000000DF"
        )));
        assert!(!ApolloOs::<CardExecutor<MockTransport>>::match_card(&hex!(
            "3BB918008131FE9E8073FF614083000000DE"
        )));
    }
}
