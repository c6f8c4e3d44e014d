//! Core traits and types for APDU (Application Protocol Data Unit) exchanges
//!
//! This crate provides the command exchange layer that card drivers build on,
//! following ISO/IEC 7816-4.
//!
//! ## Overview
//!
//! - Creating and parsing short APDU commands and responses
//! - Interpreting status words and translating them into errors
//! - Communicating with cards through a [`CardTransport`]
//! - Executing commands with the standard `61xx` / `6Cxx` handling via [`CardExecutor`]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod executor;
pub mod response;
pub mod transport;

// Core error types
mod error;
pub use error::{Error, Result, ResultExt};

// Re-exports for common types
pub use command::{Command, ExpectedLength, MAX_DATA_LEN};
pub use executor::{CardExecutor, Executor};
pub use response::error::{ResponseError, StatusError, StatusKind};
pub use response::status::StatusWord;
pub use response::{Response, utils};
pub use transport::{CardTransport, TransportError};

#[cfg(any(test, feature = "mock"))]
pub use transport::mock::{MockLog, MockTransport};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, Response, Result, ResultExt,
        executor::{CardExecutor, Executor},
        response::error::{StatusError, StatusKind},
        response::status::StatusWord,
        transport::{CardTransport, TransportError},
    };
}
