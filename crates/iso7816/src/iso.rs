//! Generic ISO 7816-4 file protocol

use apolloos_apdu_core::{Bytes, Command, Executor, ExpectedLength, Response, ResultExt};
use tracing::{debug, instrument, trace};

use crate::driver::FileOps;
use crate::fci::decode_fci;
use crate::file::File;
use crate::path::{MF_ID, Path, PathKind};
use crate::{Error, Result};

/// SELECT instruction
pub const INS_SELECT: u8 = 0xA4;
/// READ BINARY instruction
pub const INS_READ_BINARY: u8 = 0xB0;
/// GET DATA instruction
pub const INS_GET_DATA: u8 = 0xCA;

/// Largest response of a short APDU
pub const MAX_SHORT_LE: usize = 256;
/// Largest offset READ BINARY can address in P1-P2
pub const MAX_READ_OFFSET: usize = 0x7FFF;

/// Interindustry class byte
const CLA: u8 = 0x00;

/// Generic ISO 7816-4 implementation of [`FileOps`]
#[derive(Debug)]
pub struct Iso7816<E: Executor> {
    executor: E,
    max_recv_size: usize,
}

impl<E: Executor> Iso7816<E> {
    /// Create the protocol on top of an executor
    pub const fn new(executor: E) -> Self {
        Self {
            executor,
            max_recv_size: MAX_SHORT_LE,
        }
    }

    /// Get a reference to the executor
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Get a mutable reference to the executor
    pub const fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Take ownership of the executor
    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Set the largest number of bytes one response may carry, at most 256
    pub fn set_max_recv_size(&mut self, size: usize) {
        self.max_recv_size = size.clamp(1, MAX_SHORT_LE);
    }

    /// Send SELECT for the path and return the FCI bytes
    ///
    /// With `want_fci` unset the card is asked not to return any FCI.
    #[instrument(level = "debug", skip(self, path), fields(path = %path))]
    pub fn select_raw(&mut self, path: &Path, want_fci: bool) -> Result<Bytes> {
        let value = path.value();
        let (p1, data) = match path.kind() {
            PathKind::FileId => (0x00, value),
            PathKind::DfName => (0x04, value),
            PathKind::Path if path.is_mf() => (0x00, value),
            PathKind::Path => (
                0x08,
                value.strip_prefix(&MF_ID.to_be_bytes()[..]).unwrap_or(value),
            ),
            PathKind::FromCurrent => (0x09, value),
            PathKind::Parent => (0x03, &[][..]),
        };

        let mut command = Command::new(CLA, INS_SELECT, p1, if want_fci { 0x00 } else { 0x0C });
        if !data.is_empty() {
            command = command.with_data(Bytes::copy_from_slice(data));
        }
        if want_fci {
            command = command.with_le(0x00);
        }

        let fci = self
            .executor
            .transmit(&command)?
            .check()
            .context("Failed to select file")?;
        trace!(fci = %hex::encode(&fci), "Selected");
        Ok(fci)
    }

    /// Send GET DATA and return the data object
    #[instrument(level = "debug", skip(self))]
    pub fn get_data(&mut self, p1: u8, p2: u8, le: ExpectedLength) -> Result<Bytes> {
        let command = Command::new_with_le(CLA, INS_GET_DATA, p1, p2, le);
        Ok(self
            .executor
            .transmit(&command)?
            .check()
            .context("Failed to get data")?)
    }

    /// Send READ BINARY with the raw card offset and expected length
    ///
    /// Returns the response with its status unchecked.
    pub fn read_binary_raw(&mut self, offset: u16, count: usize) -> Result<Response> {
        if count > MAX_SHORT_LE {
            return Err(Error::InvalidArguments("read length exceeds a short APDU"));
        }
        let [p1, p2] = offset.to_be_bytes();
        let command = Command::new_with_le(CLA, INS_READ_BINARY, p1, p2, (count & 0xFF) as u8);
        Ok(self.executor.transmit(&command)?)
    }
}

/// Copy a READ BINARY response into `buf`
///
/// An empty payload yields the translated status, so a card that refused
/// the read surfaces its error instead of an empty read.
pub fn copy_read_response(response: Response, buf: &mut [u8]) -> Result<usize> {
    let status = response.status();
    let payload = response.into_payload();
    if payload.is_empty() {
        status.check()?;
        return Ok(0);
    }

    let n = payload.len().min(buf.len());
    if n < payload.len() {
        debug!(returned = payload.len(), kept = n, "Card returned more than requested");
    }
    buf[..n].copy_from_slice(&payload[..n]);
    Ok(n)
}

/// Check the preconditions every READ BINARY shares
pub fn check_read_args(max_recv_size: usize, buf: &[u8], count: usize) -> Result<()> {
    if count > max_recv_size {
        return Err(Error::InvalidArguments("read length exceeds the card receive size"));
    }
    if buf.len() < count {
        return Err(Error::InvalidArguments("buffer shorter than read length"));
    }
    Ok(())
}

impl<E: Executor> FileOps for Iso7816<E> {
    fn max_recv_size(&self) -> usize {
        self.max_recv_size
    }

    fn select_file(&mut self, path: &Path, want_file: bool) -> Result<Option<File>> {
        let fci = self.select_raw(path, want_file)?;
        if !want_file {
            return Ok(None);
        }
        Ok(Some(self.process_fci(&fci)?.selected_by(path)))
    }

    fn process_fci(&mut self, buf: &[u8]) -> Result<File> {
        Ok(decode_fci(buf))
    }

    #[instrument(level = "debug", skip(self, buf))]
    fn read_binary(&mut self, offset: usize, buf: &mut [u8], count: usize) -> Result<usize> {
        check_read_args(self.max_recv_size, buf, count)?;
        if offset > MAX_READ_OFFSET {
            return Err(Error::InvalidArguments("offset beyond READ BINARY range"));
        }
        let response = self.read_binary_raw(offset as u16, count)?;
        copy_read_response(response, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apolloos_apdu_core::{CardExecutor, MockLog, MockTransport, StatusKind};
    use hex_literal::hex;

    fn iso<I>(responses: I) -> (Iso7816<CardExecutor<MockTransport>>, MockLog)
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let transport = MockTransport::with_responses(responses);
        let log = transport.log();
        (Iso7816::new(CardExecutor::new(transport)), log)
    }

    #[test]
    fn test_select_commands() {
        let (mut card, log) = iso(vec![hex!("9000").to_vec(); 6]);

        card.select_raw(&Path::file_id(0x5001), false).unwrap();
        card.select_raw(&Path::mf(), false).unwrap();
        card.select_raw(&Path::absolute(&[0x5000, 0x5001]).unwrap(), true).unwrap();
        card.select_raw(&"5000/5001".parse().unwrap(), false).unwrap();
        card.select_raw(&Path::df_name(&hex!("F381")).unwrap(), false).unwrap();
        card.select_raw(&Path::parent(), false).unwrap();

        let commands: Vec<Vec<u8>> = log.commands().iter().map(|c| c.to_vec()).collect();
        assert_eq!(
            commands,
            vec![
                hex!("00A4000C025001").to_vec(),
                hex!("00A4000C023F00").to_vec(),
                hex!("00A408000450005001 00").to_vec(),
                hex!("00A4090C0450005001").to_vec(),
                hex!("00A4040C02F381").to_vec(),
                hex!("00A4030C").to_vec(),
            ]
        );
    }

    #[test]
    fn test_select_longest_path() {
        let (mut card, log) = iso([hex!("9000").to_vec()]);

        let path: Path = "3F00/5000/5001/5002/5003/5004/5005/5006".parse().unwrap();
        card.select_raw(&path, false).unwrap();
        assert_eq!(
            log.last_command().unwrap().as_ref(),
            &hex!("00A4080C0E 5000500150025003500450055006")
        );
        assert!(format!("{path}/5007").parse::<Path>().is_err());
    }

    #[test]
    fn test_select_file_decodes_fci() {
        let (mut card, _) = iso([hex!("6208 800204A0 820101 9000").to_vec()]);
        // the FCP above is truncated by one byte, so decoding yields nothing
        let file = card
            .select_file(&Path::absolute(&[0x0F02]).unwrap(), true)
            .unwrap()
            .unwrap();
        assert_eq!(file.size, 0);
        assert_eq!(file.id, Some(0x0F02));

        let (mut card, _) = iso([hex!("6207 800204A0 820101 9000").to_vec()]);
        let file = card.select_file(&Path::file_id(0x0F02), true).unwrap().unwrap();
        assert_eq!(file.size, 0x04A0);
        assert_eq!(file.path, Some(Path::file_id(0x0F02)));
    }

    #[test]
    fn test_select_not_found() {
        let (mut card, _) = iso([hex!("6A82").to_vec()]);
        let err = card.select_file(&Path::file_id(0x1234), true).unwrap_err();
        assert_eq!(err.status_kind(), Some(StatusKind::FileNotFound));
    }

    #[test]
    fn test_read_binary() {
        let (mut card, log) = iso([
            hex!("0102039000").to_vec(),
            hex!("6B00").to_vec(),
            hex!("9000").to_vec(),
        ]);
        let mut buf = [0u8; 8];

        assert_eq!(card.read_binary(0x0102, &mut buf, 3).unwrap(), 3);
        assert_eq!(&buf[..3], &hex!("010203"));
        assert_eq!(log.last_command().unwrap().as_ref(), &hex!("00B0010203"));

        let err = card.read_binary(0x7000, &mut buf, 8).unwrap_err();
        assert_eq!(err.status_kind(), Some(StatusKind::IncorrectParameters));

        assert_eq!(card.read_binary(0, &mut buf, 8).unwrap(), 0);
    }

    #[test]
    fn test_read_binary_preconditions() {
        let (mut card, log) = iso(Vec::new());
        let mut buf = [0u8; 4];

        assert!(matches!(
            card.read_binary(0, &mut buf, 5),
            Err(Error::InvalidArguments(_))
        ));
        assert!(matches!(
            card.read_binary(0x8000, &mut buf, 4),
            Err(Error::InvalidArguments(_))
        ));
        card.set_max_recv_size(2);
        assert!(matches!(
            card.read_binary(0, &mut buf, 3),
            Err(Error::InvalidArguments(_))
        ));
        assert_eq!(log.command_count(), 0);
    }

    #[test]
    fn test_read_binary_all_chunks() {
        let (mut card, log) = iso([
            hex!("01029000").to_vec(),
            hex!("03049000").to_vec(),
            hex!("059000").to_vec(),
            hex!("9000").to_vec(),
        ]);
        card.set_max_recv_size(2);

        let data = card.read_binary_all(0, 6).unwrap();
        assert_eq!(data, hex!("0102030405"));
        // an empty read ends the loop
        assert_eq!(log.command_count(), 4);
        assert_eq!(log.last_command().unwrap().as_ref(), &hex!("00B0000501"));
    }

    #[test]
    fn test_read_binary_all_end_of_file() {
        let (mut card, _) = iso([hex!("01029000").to_vec(), hex!("6282").to_vec()]);
        card.set_max_recv_size(2);

        assert_eq!(card.read_binary_all(0, 10).unwrap(), hex!("0102"));
    }

    #[test]
    fn test_get_data() {
        let (mut card, log) = iso([hex!("AABB9000").to_vec(), hex!("6A88").to_vec()]);

        assert_eq!(card.get_data(0x01, 0x01, 0x20).unwrap().as_ref(), &hex!("AABB"));
        assert_eq!(log.last_command().unwrap().as_ref(), &hex!("00CA010120"));

        let err = card.get_data(0x01, 0x01, 0x20).unwrap_err();
        assert_eq!(err.status_kind(), Some(StatusKind::DataObjectNotFound));
    }
}
