//! Device manager for PC/SC operations

use pcsc::{Context, Scope};
use tracing::{debug, trace};

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::transport::PcscTransport;
use crate::util::match_atr;

/// Manager for PC/SC device operations
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    /// PC/SC context
    context: Context,
}

impl PcscDeviceManager {
    /// Create a new PC/SC device manager
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context })
    }

    /// List all available card readers
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let readers = match self.context.list_readers_owned() {
            Ok(readers) => readers,
            Err(pcsc::Error::NoReadersAvailable) => return Err(PcscError::NoReadersAvailable),
            Err(e) => return Err(e.into()),
        };
        if readers.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        let mut result = Vec::with_capacity(readers.len());
        for reader_name in readers {
            let mut reader_states = vec![pcsc::ReaderState::new(
                reader_name.as_c_str(),
                pcsc::State::UNAWARE,
            )];

            match self.context.get_status_change(None, &mut reader_states) {
                Ok(()) => result.push(PcscReader::from_reader_state(&reader_states[0])),
                Err(e) => {
                    // assume no card when the state cannot be read
                    debug!(error = %e, "Failed to get reader status");
                    result.push(PcscReader::new(
                        reader_name.to_string_lossy().into_owned(),
                        false,
                        None,
                    ));
                }
            }
        }

        trace!(count = result.len(), "Listed readers");
        Ok(result)
    }

    /// Open a connection to a specific reader
    pub fn open_reader(&self, reader_name: &str) -> Result<PcscTransport, PcscError> {
        self.open_reader_with_config(reader_name, PcscConfig::default())
    }

    /// Open a connection to a specific reader with custom configuration
    pub fn open_reader_with_config(
        &self,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        PcscTransport::new(self.context.clone(), reader_name, config)
    }

    /// Find the first reader holding a card whose ATR matches the pattern
    pub fn find_reader_with_atr(
        &self,
        pattern: &[u8],
        mask: Option<&[u8]>,
    ) -> Result<PcscReader, PcscError> {
        self.list_readers()?
            .into_iter()
            .find(|reader| {
                reader
                    .atr()
                    .is_some_and(|atr| match_atr(atr, pattern, mask))
            })
            .ok_or_else(|| PcscError::NoCard("no card with matching ATR".to_string()))
    }
}
