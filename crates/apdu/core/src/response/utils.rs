//! Utility functions for device reply handling

use tracing::debug;

use crate::response::status::ErrorCode;
use crate::{Error, Result};

/// Split raw reply data into its status word bytes and payload
///
/// Returns a tuple containing:
/// - The status word as a tuple (SW1, SW2)
/// - The payload data (without the status word)
///
/// # Errors
/// Returns [`Error::EmptyBuffer`] if the data is too short to contain a status word.
pub fn extract_response_parts(data: &[u8]) -> Result<((u8, u8), &[u8])> {
    if data.len() < 2 {
        debug!("Response too short: {} bytes", data.len());
        return Err(Error::EmptyBuffer);
    }

    let len = data.len();
    let sw1 = data[len - 2];
    let sw2 = data[len - 1];

    Ok(((sw1, sw2), &data[..len - 2]))
}

/// Split raw reply data into its big-endian return code and payload
///
/// # Errors
/// Returns [`Error::EmptyBuffer`] if the data is too short to contain a status word.
pub fn extract_status_and_payload(data: &[u8]) -> Result<(ErrorCode, &[u8])> {
    let ((sw1, sw2), payload) = extract_response_parts(data)?;
    Ok((ErrorCode::from_bytes(sw1, sw2), payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_response_parts() {
        // Test with payload and status
        let data = [0x01, 0x02, 0x03, 0x90, 0x00];
        let result = extract_response_parts(&data).unwrap();
        assert_eq!(result.0, (0x90, 0x00));
        assert_eq!(result.1, &[0x01, 0x02, 0x03]);

        // Test with only status
        let data = [0x90, 0x00];
        let result = extract_response_parts(&data).unwrap();
        assert_eq!(result.0, (0x90, 0x00));
        assert!(result.1.is_empty());

        // Test with insufficient data
        let data = [0x90];
        assert_eq!(extract_response_parts(&data).unwrap_err(), Error::EmptyBuffer);
    }

    #[test]
    fn test_status_word_is_big_endian() {
        let data = [0xAA, 0x6A, 0x80];
        let (code, payload) = extract_status_and_payload(&data).unwrap();
        assert_eq!(code, ErrorCode(0x6A80));
        assert_eq!(payload, &[0xAA]);
    }
}
