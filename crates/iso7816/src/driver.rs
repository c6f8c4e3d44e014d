//! Operation tables implemented by card drivers

use tracing::{debug, trace};

use apolloos_apdu_core::StatusKind;

use crate::atr::{AtrTable, match_atr_table};
use crate::file::File;
use crate::path::Path;
use crate::{Error, Result};

/// File operations of a card
pub trait FileOps {
    /// Largest number of bytes one READ BINARY may return
    fn max_recv_size(&self) -> usize;

    /// Select a file, returning its attributes when `want_file` is set
    fn select_file(&mut self, path: &Path, want_file: bool) -> Result<Option<File>>;

    /// Decode the FCI returned by SELECT
    fn process_fci(&mut self, buf: &[u8]) -> Result<File>;

    /// Read up to `count` bytes of the selected file at `offset` into `buf`
    ///
    /// Returns the number of bytes read. `count` must not exceed
    /// [`max_recv_size`](Self::max_recv_size) nor the length of `buf`.
    fn read_binary(&mut self, offset: usize, buf: &mut [u8], count: usize) -> Result<usize>;

    /// Read `len` bytes of the selected file starting at `offset`
    ///
    /// Reads in chunks of at most [`max_recv_size`](Self::max_recv_size) and
    /// stops early at the end of the file, so the result may be shorter.
    fn read_binary_all(&mut self, offset: usize, len: usize) -> Result<Vec<u8>> {
        let mut data = vec![0u8; len];
        let mut done = 0;

        while done < len {
            let chunk = (len - done).min(self.max_recv_size());
            match self.read_binary(offset + done, &mut data[done..done + chunk], chunk) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.status_kind() == Some(StatusKind::FileEndReached) => break,
                Err(e) => return Err(e),
            }
            trace!(done, len, "Read binary progress");
        }

        data.truncate(done);
        Ok(data)
    }
}

/// Generic card control operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardCtl {
    /// Erase the card contents
    EraseCard,
    /// Fetch a default key for the given key reference
    GetDefaultKey(u8),
    /// Read the card lifecycle state
    LifecycleGet,
    /// Change the card lifecycle state
    LifecycleSet(u8),
    /// Fetch the card serial number
    GetSerialNumber,
    /// Fetch security environment information
    GetSeInfo,
}

/// Result of a card control operation
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardCtlResponse {
    /// Card serial number
    SerialNumber(Vec<u8>),
}

/// A card driver: ATR based matching, session setup and card control
pub trait CardDriver: FileOps {
    /// Full driver name
    const NAME: &'static str;

    /// Short driver name
    const SHORT_NAME: &'static str;

    /// Cards handled by this driver
    fn atr_table() -> &'static AtrTable;

    /// Whether this driver handles the card with the given ATR
    fn match_card(atr: &[u8]) -> bool {
        match_atr_table(Self::atr_table(), atr).is_some_and(|entry| {
            debug!(driver = Self::SHORT_NAME, card = entry.name, "Card matched");
            true
        })
    }

    /// Prepare a session with a matched card
    fn init(&mut self) -> Result<()>;

    /// Tear down the session
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Run a card control operation
    fn card_ctl(&mut self, cmd: CardCtl) -> Result<CardCtlResponse> {
        debug!(driver = Self::SHORT_NAME, ?cmd, "Unsupported card control");
        Err(Error::NotSupported)
    }
}
