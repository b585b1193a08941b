//! Error types specific to device transports

use tracing::debug;

use crate::response::error::ResponseError;
use crate::response::status::{ErrorCode, ErrorDescriptions};

/// Transport error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The transport rejected a reply whose status word was not accepted
    #[error("Status word error: {0:#06X}")]
    StatusWord(u16),

    /// Connection error
    #[error("Failed to connect to device")]
    Connection,

    /// Transmission error
    #[error("Failed to transmit data")]
    Transmission,

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Cancelled operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Other error with message
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a new status word error from individual bytes
    pub const fn status_word_bytes(sw1: u8, sw2: u8) -> Self {
        Self::StatusWord(((sw1 as u16) << 8) | (sw2 as u16))
    }

    /// Get the status word if this is a status word error
    pub const fn get_status_word(&self) -> Option<u16> {
        match self {
            Self::StatusWord(sw) => Some(*sw),
            _ => None,
        }
    }

    /// Create a general other error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }

    /// Collapse this failure into the single structured error shape
    ///
    /// A device status word is resolved through the description table. Every
    /// other failure becomes [`ErrorCode::UNKNOWN_TRANSPORT_ERROR`].
    pub fn normalize(&self, overrides: Option<&ErrorDescriptions>) -> ResponseError {
        match self.get_status_word() {
            Some(sw) => ResponseError::from_return_code_with(ErrorCode::from_status_word(sw), overrides),
            None => {
                debug!(error = %self, "Normalizing transport failure");
                ResponseError::from_return_code(ErrorCode::UNKNOWN_TRANSPORT_ERROR)
            }
        }
    }
}
