//! PC/SC transport implementation for APDU exchanges
//!
//! This crate provides an implementation of the `CardTransport` trait from
//! `apolloos-apdu-core` using the PC/SC API for communication with smart cards.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use apolloos_apdu_core::{CardExecutor, Command, Executor};
//! use apolloos_apdu_pcsc::PcscDeviceManager;
//!
//! let manager = PcscDeviceManager::new()?;
//! let Some(reader) = manager.list_readers()?.into_iter().find(|r| r.has_card()) else {
//!     println!("No card found");
//!     return Ok(());
//! };
//!
//! let transport = manager.open_reader(reader.name())?;
//! let mut executor = CardExecutor::new(transport);
//! let response = executor.transmit(&Command::new_with_le(0x00, 0xCA, 0x01, 0x01, 0x20))?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;
mod util;

pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;
pub use util::match_atr;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
