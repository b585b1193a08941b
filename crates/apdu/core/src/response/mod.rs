//! Device reply handling
//!
//! Every raw reply goes through [`unwrap_response`], which splits off the
//! trailing big-endian status word and yields either a [`ResponsePayload`]
//! or a structured [`ResponseError`].

pub mod error;
pub mod status;
pub mod utils;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::cursor::ByteCursor;
use crate::{Error, Result};
use error::ResponseError;
use status::{ErrorCode, ErrorDescriptions};

/// Read-only cursor over the part of a reply preceding its status word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePayload {
    cursor: ByteCursor,
}

impl ResponsePayload {
    /// Wrap `payload` with the read offset at zero
    pub fn new(payload: &[u8]) -> Self {
        Self {
            cursor: ByteCursor::from_slice(payload),
        }
    }

    /// Read `len` bytes and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8]> {
        self.cursor.read_bytes(len)
    }

    /// Advance past `len` bytes
    pub fn skip_bytes(&mut self, len: usize) -> Result<()> {
        self.cursor.skip_bytes(len)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8()
    }

    /// Read a big-endian `u16`
    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.cursor.read_u16_be()
    }

    /// Read a big-endian `u32`
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.cursor.read_u32_be()
    }

    /// Read a field prefixed by a single length byte
    pub fn read_length_prefixed(&mut self) -> Result<&[u8]> {
        let len = self.cursor.read_u8()? as usize;
        self.cursor.read_bytes(len)
    }

    /// Move the read offset back to the start
    pub const fn reset_offset(&mut self) {
        self.cursor.reset_read_offset();
    }

    /// Number of unread bytes
    pub fn length(&self) -> usize {
        self.cursor.length()
    }

    /// Check if no unread bytes remain
    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Copy of the full payload
    pub fn complete_buffer(&self) -> Bytes {
        self.cursor.complete_buffer()
    }

    /// Copy of the unread bytes
    pub fn available_buffer(&self) -> Bytes {
        self.cursor.available_buffer()
    }
}

/// Validate a raw device reply and strip its status word
///
/// A success status yields the preceding bytes as a payload. Any other status
/// is resolved through the description table, with `overrides` taking
/// precedence, and device-supplied text in the payload is appended to the
/// message.
pub fn unwrap_response(raw: &[u8], overrides: Option<&ErrorDescriptions>) -> Result<ResponsePayload> {
    let (code, payload) = utils::extract_status_and_payload(raw)?;

    trace!(
        return_code = %code,
        payload_len = payload.len(),
        "Parsed device reply"
    );

    if code.is_success() {
        return Ok(ResponsePayload::new(payload));
    }

    let mut err = ResponseError::from_return_code_with(code, overrides);
    if !payload.is_empty() {
        err.error_message.push_str(" : ");
        err.error_message.push_str(&ascii_lossy(payload));
    }

    debug!(return_code = %code, message = %err.error_message, "Device reported an error");
    Err(Error::Response(err))
}

/// Decode bytes as 7-bit ASCII, clearing the high bit of every byte
pub fn ascii_lossy(data: &[u8]) -> String {
    data.iter().map(|&b| char::from(b & 0x7F)).collect()
}

/// Check whether `raw` ends in one of `accepted` status words
pub fn has_accepted_status(raw: &[u8], accepted: &[ErrorCode]) -> bool {
    utils::extract_status_and_payload(raw).is_ok_and(|(code, _)| accepted.contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_success_returns_payload() {
        let raw = [0x01, 0x02, 0x03, 0x90, 0x00];
        let mut payload = unwrap_response(&raw, None).unwrap();
        assert_eq!(payload.complete_buffer().as_ref(), &[0x01, 0x02, 0x03]);
        assert_eq!(payload.length(), 3);
        assert_eq!(payload.read_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(payload.available_buffer().as_ref(), &[0x03]);
        payload.reset_offset();
        assert_eq!(payload.length(), 3);
    }

    #[test]
    fn test_unwrap_status_only() {
        let payload = unwrap_response(&[0x90, 0x00], None).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_unwrap_empty_reply() {
        assert_eq!(unwrap_response(&[], None).unwrap_err(), Error::EmptyBuffer);
        assert_eq!(unwrap_response(&[0x90], None).unwrap_err(), Error::EmptyBuffer);
    }

    #[test]
    fn test_unwrap_bad_key_handle() {
        let err = unwrap_response(&[0x6A, 0x80], None).unwrap_err();
        let response = err.as_response().unwrap();
        assert_eq!(response.return_code, ErrorCode::BAD_KEY_HANDLE);
        assert_eq!(response.error_message, "Bad key handle");
    }

    #[test]
    fn test_unwrap_appends_device_text() {
        let mut raw = b"wrong tx".to_vec();
        raw.extend_from_slice(&[0x69, 0x84]);

        let err = unwrap_response(&raw, None).unwrap_err();
        assert_eq!(err.return_code(), ErrorCode::DATA_IS_INVALID);
        assert_eq!(
            err.as_response().unwrap().error_message,
            "Data is invalid : wrong tx"
        );
    }

    #[test]
    fn test_unwrap_with_overrides() {
        let mut overrides = ErrorDescriptions::new();
        overrides.insert(ErrorCode(0x6A8B), "Account not found".to_string());

        let err = unwrap_response(&[0x6A, 0x8B], Some(&overrides)).unwrap_err();
        assert_eq!(err.as_response().unwrap().error_message, "Account not found");

        let err = unwrap_response(&[0x6A, 0x8B], None).unwrap_err();
        assert_eq!(
            err.as_response().unwrap().error_message,
            "Unknown Return Code: 0x6A8B"
        );
    }

    #[test]
    fn test_read_length_prefixed() {
        let mut payload = ResponsePayload::new(&[0x03, b'a', b'b', b'c', 0x05, b'x']);
        assert_eq!(payload.read_length_prefixed().unwrap(), b"abc");
        assert!(payload.read_length_prefixed().is_err());
    }

    #[test]
    fn test_ascii_lossy() {
        assert_eq!(ascii_lossy(b"1.2.3"), "1.2.3");
        assert_eq!(ascii_lossy(&[b'a', 0xFF]), "a\u{7F}");
        assert_eq!(ascii_lossy(&[0xE1, 0xB2]), "a2");
    }

    #[test]
    fn test_has_accepted_status() {
        let accepted = [ErrorCode::NO_ERRORS, ErrorCode::CLA_NOT_SUPPORTED];
        assert!(has_accepted_status(&[0x6E, 0x00], &accepted));
        assert!(!has_accepted_status(&[0x6E, 0x01], &accepted));
        assert!(!has_accepted_status(&[], &accepted));
    }
}
