//! Transport seam for talking to a device
//!
//! A transport moves raw bytes. It knows nothing about paths, chunks or reply
//! layouts; the physical connection (USB HID, BLE, speculos, ...) lives behind
//! it.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

use crate::command::Command;
use crate::response::status::ErrorCode;

/// Trait for device transports
///
/// `accepted` lists the status words the caller expects to interpret itself.
/// A transport may raise [`TransportError::StatusWord`] for any other status,
/// or return every reply unchanged and let the response envelope decide.
pub trait DeviceTransport: Send + Sync + fmt::Debug {
    /// Send one command and return the raw reply, status word included
    fn exchange(&mut self, command: &Command, accepted: &[ErrorCode]) -> Result<Bytes, TransportError> {
        trace!(command = %command, "Exchanging command");
        let result = self.do_exchange(command, accepted);
        match &result {
            Ok(response) => {
                trace!(response = ?hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during exchange");
            }
        }
        result
    }

    /// Internal implementation of exchange
    /// This is the method that concrete implementations should override
    fn do_exchange(&mut self, command: &Command, accepted: &[ErrorCode]) -> Result<Bytes, TransportError>;
}
