//! Core types for APDU (Application Protocol Data Unit) exchanges with Ledger-style devices
//!
//! This crate provides the device-agnostic half of the protocol layer:
//!
//! - [`ByteCursor`], a bounds-checked buffer with independent read and write offsets
//! - [`ErrorCode`] and its description table, overridable per call
//! - [`ResponseError`], the structured error every failure can be flattened into
//! - [`unwrap_response`], the single chokepoint that validates a raw reply
//! - [`Command`] frames and the [`DeviceTransport`] seam
//!
//! Path encoding, chunking and reply layouts for specific commands live in
//! the `ledger-app` crate.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod cursor;
pub mod response;
pub mod transport;

// Core error types
mod error;
pub use error::{Error, Result};

// Re-exports for common types
pub use command::Command;
pub use cursor::ByteCursor;
pub use response::error::ResponseError;
pub use response::status::{ErrorCode, ErrorDescriptions, describe};
pub use response::{ResponsePayload, unwrap_response, utils};
pub use transport::{DeviceTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        ByteCursor, Bytes, BytesMut, Command, DeviceTransport, Error, ErrorCode, ErrorDescriptions,
        ResponseError, ResponsePayload, Result, TransportError, describe, unwrap_response,
    };
}
