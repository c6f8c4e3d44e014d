//! Per-card session state

use crate::serial::SerialNumber;

/// State kept for one bound card
///
/// The serial number is set once, by the first successful fetch, and never
/// cleared. The file size is overwritten only by a successful selection; 0
/// means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSession {
    pub(crate) serial: Option<SerialNumber>,
    pub(crate) file_size: usize,
}

impl CardSession {
    /// Fresh session with nothing cached
    pub const fn new() -> Self {
        Self {
            serial: None,
            file_size: 0,
        }
    }

    /// Cached serial number
    pub const fn serial(&self) -> Option<&SerialNumber> {
        self.serial.as_ref()
    }

    /// Content size of the selected file, 0 when unknown
    pub const fn file_size(&self) -> usize {
        self.file_size
    }
}
