//! Core error type for all device operations
//!
//! Every failure in the workspace is one of these variants. Input validation
//! errors are raised before anything is sent, cursor errors mean the device
//! returned bytes of an unexpected shape, and [`Error::Response`] carries
//! device-reported, protocol and normalized transport failures.

use crate::response::error::ResponseError;
use crate::response::status::ErrorCode;

/// Result type for device operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type that encompasses all possible errors in the workspace
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    //
    // Cursor related errors
    //
    /// A read or skip would run past the end of the buffer
    #[error("Attempt to read beyond buffer length: {requested} bytes at offset {offset}, buffer holds {capacity}")]
    BufferUnderrun {
        /// Offset the read started from
        offset: usize,
        /// Number of bytes requested
        requested: usize,
        /// Total buffer length
        capacity: usize,
    },

    /// An explicit offset lies outside the buffer
    #[error("Invalid offset {offset}, buffer holds {capacity}")]
    InvalidOffset {
        /// Offending offset
        offset: usize,
        /// Total buffer length
        capacity: usize,
    },

    //
    // Path related errors
    //
    /// Path string does not start with `m/`
    #[error("Path should start with \"m/\" (e.g \"m/44'/461'/5'/0/3\")")]
    InvalidPathPrefix,

    /// Path segment count is not one of the accepted lengths
    #[error("Invalid path length {length}, expected one of {expected:?}")]
    InvalidPathLength {
        /// Number of segments after `m`
        length: usize,
        /// Accepted segment counts
        expected: Vec<usize>,
    },

    /// Path segment is not a number
    #[error("Invalid path : {0} is not a number. (e.g \"m/44'/461'/5'/0/3\")")]
    InvalidPathSegment(String),

    /// Path segment is bigger than or equal to the hardened bit
    #[error("Incorrect child value {0} (bigger or equal to 0x80000000)")]
    SegmentOutOfRange(u64),

    /// Serialized path is not a whole number of 4-byte words
    #[error("The buffer length must be a multiple of 4, got {0}")]
    InvalidBufferLength(usize),

    /// Path with no segments
    #[error("The path cannot be empty")]
    EmptyPath,

    //
    // Response related errors
    //
    /// Reply too short to contain a status word
    #[error("Empty buffer: reply too short to hold a status word")]
    EmptyBuffer,

    /// Structured error reported by the device, the protocol layer or the transport
    #[error(transparent)]
    Response(#[from] ResponseError),

    //
    // Command related errors
    //
    /// Command frame has an invalid length or a payload too long for one Lc byte
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),

    //
    // Configuration errors
    //
    /// Application configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl Error {
    /// Create a structured error for a malformed reply
    pub fn technical_problem(message: impl Into<String>) -> Self {
        Self::Response(ResponseError::new(ErrorCode::TECHNICAL_PROBLEM, message))
    }

    /// Numeric code attached to this error
    pub const fn return_code(&self) -> ErrorCode {
        match self {
            Self::BufferUnderrun { .. } | Self::InvalidOffset { .. } => ErrorCode::UNKNOWN_ERROR,
            Self::InvalidPathPrefix
            | Self::InvalidPathLength { .. }
            | Self::InvalidPathSegment(_)
            | Self::SegmentOutOfRange(_)
            | Self::InvalidBufferLength(_)
            | Self::EmptyPath
            | Self::InvalidCommandLength(_)
            | Self::InvalidConfig(_) => ErrorCode::GENERIC_ERROR,
            Self::EmptyBuffer => ErrorCode::EMPTY_BUFFER,
            Self::Response(err) => err.return_code,
        }
    }

    /// Get the structured error if the device or transport reported one
    pub const fn as_response(&self) -> Option<&ResponseError> {
        match self {
            Self::Response(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Error> for ResponseError {
    fn from(error: Error) -> Self {
        match error {
            Error::Response(err) => err,
            other => Self::new(other.return_code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_codes() {
        assert_eq!(Error::InvalidPathPrefix.return_code(), ErrorCode::GENERIC_ERROR);
        assert_eq!(Error::EmptyBuffer.return_code(), ErrorCode::EMPTY_BUFFER);
        assert_eq!(
            Error::BufferUnderrun {
                offset: 0,
                requested: 1,
                capacity: 0
            }
            .return_code(),
            ErrorCode::UNKNOWN_ERROR
        );
        assert_eq!(
            Error::technical_problem("Invalid response length").return_code(),
            ErrorCode::TECHNICAL_PROBLEM
        );
    }

    #[test]
    fn test_flatten_into_response_error() {
        let err: ResponseError = Error::EmptyPath.into();
        assert_eq!(err.return_code, ErrorCode::GENERIC_ERROR);
        assert_eq!(err.error_message, "The path cannot be empty");

        let device = ResponseError::from_return_code(ErrorCode::BAD_KEY_HANDLE);
        let err: ResponseError = Error::Response(device.clone()).into();
        assert_eq!(err, device);
    }
}
