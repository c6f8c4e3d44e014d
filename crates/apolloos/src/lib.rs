//! Driver for AppoloOS based cards such as the Serbian eID
//!
//! [`ApolloOs`] implements [`FileOps`](apolloos_iso7816::FileOps) and
//! [`CardDriver`](apolloos_iso7816::CardDriver) by delegating to the generic
//! ISO 7816-4 protocol and correcting where the card deviates from it:
//!
//! - SELECT does not report file sizes, so the driver reads them from the
//!   file header and keeps the size of the selected file in the session
//! - EF content starts after a six byte header, so read offsets are shifted
//!   and read lengths clamped to the file size
//! - the serial number is fetched once with GET DATA and cached
//!
//! ```no_run
//! use apolloos::ApolloOs;
//! use apolloos_apdu_core::{CardExecutor, MockTransport};
//! use apolloos_iso7816::{FileOps, Path};
//!
//! # fn main() -> apolloos_iso7816::Result<()> {
//! # let atr = [0u8; 18];
//! let executor = CardExecutor::new(MockTransport::new());
//! let mut card = ApolloOs::bind(executor, &atr)?;
//! card.select_file(&"3F00/0F02".parse::<Path>()?, false)?;
//! let document = card.read_binary_all(0, card.file_size())?;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod constants;
mod driver;
mod serial;
mod session;

pub use driver::ApolloOs;
pub use serial::SerialNumber;
pub use session::CardSession;
