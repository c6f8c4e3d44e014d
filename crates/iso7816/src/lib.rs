//! Generic ISO 7816-4 file protocol and card driver traits
//!
//! [`Iso7816`] implements file selection, FCI decoding and binary reads as
//! the standard describes them. Card drivers implement [`FileOps`] and
//! [`CardDriver`], delegating to [`Iso7816`] and correcting what their card
//! does differently.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod atr;
pub mod driver;
pub mod fci;
pub mod file;
pub mod iso;
pub mod path;

mod error;
pub use error::{Error, Result};

pub use atr::{AtrEntry, AtrTable, match_atr_table};
pub use driver::{CardCtl, CardCtlResponse, CardDriver, FileOps};
pub use fci::{decode_fci, parse_fci};
pub use file::{EfStructure, File, FileType};
pub use iso::Iso7816;
pub use path::{Path, PathKind};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        CardCtl, CardCtlResponse, CardDriver, Error, File, FileOps, FileType, Iso7816, Path,
        Result,
    };
}
