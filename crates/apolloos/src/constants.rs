//! Protocol constants of AppoloOS cards

use apolloos_iso7816::{AtrEntry, AtrTable};

/// Bytes the card keeps in front of every EF's content
pub const HEADER_LEN: usize = 6;

/// Length of the READ BINARY used to learn a file's size
pub const SIZE_PROBE_LEN: usize = 6;

/// Length of the card serial number
pub const SERIAL_LEN: usize = 16;

/// Largest response the card returns in one exchange
pub const MAX_RECV_SIZE: usize = 255;

/// GET DATA parameters of the serial number
pub mod serial_number {
    /// P1
    pub const P1: u8 = 0x01;
    /// P2
    pub const P2: u8 = 0x01;
    /// Expected length
    pub const LE: u8 = 0x20;
}

/// ATR of the Serbian eID
pub const SERBIAN_EID_ATR: &str = "3B:B9:18:00:81:31:FE:9E:80:73:FF:61:40:83:00:00:00:DF";

/// Cards handled by the driver
pub const ATRS: &AtrTable = &[AtrEntry::new(SERBIAN_EID_ATR, "Serbian EID")];
