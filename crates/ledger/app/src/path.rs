//! BIP32 derivation path encoding
//!
//! The binary form is one 4-byte little-endian word per segment, with bit 31
//! set for hardened segments. The string form is `m/44'/461'/0/0/5`.

use bytes::{BufMut, Bytes, BytesMut};
use ledger_apdu_core::{Error, Result};
use tracing::trace;

use crate::constants::HARDENED;

/// Serialize a path string into its binary form
///
/// When `required_lengths` is non-empty the number of segments after `m`
/// must be one of its values.
///
/// # Errors
/// - [`Error::InvalidPathPrefix`] if the path does not start with `m/`
/// - [`Error::InvalidPathLength`] if the segment count is not accepted
/// - [`Error::InvalidPathSegment`] if a segment is not a number
/// - [`Error::SegmentOutOfRange`] if a segment is `>= 0x80000000` before hardening
pub fn serialize_path(path: &str, required_lengths: &[usize]) -> Result<Bytes> {
    let segments = path.strip_prefix("m/").ok_or(Error::InvalidPathPrefix)?;
    let segments: Vec<&str> = segments.split('/').collect();

    if !required_lengths.is_empty() && !required_lengths.contains(&segments.len()) {
        return Err(Error::InvalidPathLength {
            length: segments.len(),
            expected: required_lengths.to_vec(),
        });
    }

    let mut buf = BytesMut::with_capacity(4 * segments.len());
    for segment in segments {
        buf.put_u32_le(parse_segment(segment)?);
    }

    trace!(path, serialized = %hex::encode(&buf), "Serialized path");
    Ok(buf.freeze())
}

fn parse_segment(segment: &str) -> Result<u32> {
    let (digits, hardened) = match segment.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (segment, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPathSegment(digits.to_string()));
    }

    // all-digit strings only fail to parse on overflow
    let value: u64 = digits.parse().map_err(|_| Error::SegmentOutOfRange(u64::MAX))?;
    if value >= u64::from(HARDENED) {
        return Err(Error::SegmentOutOfRange(value));
    }

    let value = value as u32;
    Ok(if hardened { value | HARDENED } else { value })
}

/// Deserialize a binary path back into its canonical string form
///
/// # Errors
/// - [`Error::InvalidBufferLength`] if the length is not a multiple of 4
/// - [`Error::EmptyPath`] if there are no words at all
pub fn deserialize_path(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidBufferLength(bytes.len()));
    }

    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect();

    path_from_indices(&words)
}

/// Render raw path words, hardened bit included, as a path string
///
/// # Errors
/// Returns [`Error::EmptyPath`] if `indices` is empty.
pub fn path_from_indices(indices: &[u32]) -> Result<String> {
    if indices.is_empty() {
        return Err(Error::EmptyPath);
    }

    let segments: Vec<String> = indices
        .iter()
        .map(|&value| {
            let child = value & !HARDENED;
            if value & HARDENED != 0 {
                format!("{child}'")
            } else {
                child.to_string()
            }
        })
        .collect();

    Ok(format!("m/{}", segments.join("/")))
}
