//! Splitting multi-round commands into chunks
//!
//! The first chunk always carries the serialized derivation path. The message
//! follows in slices of at most `chunk_size` bytes. The device accumulates
//! chunks across INIT, ADD and LAST, so they must be sent in order.

use bytes::Bytes;
use derive_more::{Deref, Display};
use ledger_apdu_core::{Error, Result};

use crate::path::serialize_path;

/// Position tag carried in P1 of every chunk exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[repr(u8)]
pub enum PayloadType {
    /// First chunk of a multi-round command
    #[display("INIT")]
    Init = 0x00,
    /// Any chunk between the first and the last
    #[display("ADD")]
    Add = 0x01,
    /// Final chunk of a multi-round command
    #[display("LAST")]
    Last = 0x02,
}

impl PayloadType {
    /// Tag for the 1-based chunk `idx` out of `total`
    ///
    /// When the first chunk is also the last one it is tagged [`Self::Last`].
    pub const fn for_position(idx: usize, total: usize) -> Self {
        if idx == total {
            Self::Last
        } else if idx == 1 {
            Self::Init
        } else {
            Self::Add
        }
    }
}

impl From<PayloadType> for u8 {
    fn from(value: PayloadType) -> Self {
        value as Self
    }
}

/// One bounded slice of a multi-round command's payload
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Chunk(Bytes);

impl Chunk {
    /// Wrap raw chunk bytes
    pub const fn new(data: Bytes) -> Self {
        Self(data)
    }

    /// Take the underlying bytes
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for Chunk {
    fn from(data: Bytes) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Chunk {
    fn from(data: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(data))
    }
}

/// Plan the ordered chunks for `message` signed under `path`
///
/// The result always holds the path chunk first, followed by
/// `ceil(message.len() / chunk_size)` message chunks. An empty message yields
/// the path chunk alone.
///
/// # Errors
/// Returns [`Error::InvalidConfig`] if `chunk_size` is zero, and propagates
/// any path validation failure from [`serialize_path`].
pub fn plan_chunks(
    path: &str,
    message: &[u8],
    chunk_size: usize,
    required_lengths: &[usize],
) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(Error::InvalidConfig("chunk size must be greater than zero"));
    }

    let serialized = serialize_path(path, required_lengths)?;

    let mut chunks = Vec::with_capacity(1 + message.len().div_ceil(chunk_size));
    chunks.push(Chunk::new(serialized));

    let message = Bytes::copy_from_slice(message);
    let mut start = 0;
    while start < message.len() {
        let end = usize::min(start + chunk_size, message.len());
        chunks.push(Chunk::new(message.slice(start..end)));
        start = end;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "m/44'/461'/0/0/5";

    #[test]
    fn test_empty_message_is_path_only() {
        let chunks = plan_chunks(PATH, &[], 250, &[]).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 20);
    }

    #[test]
    fn test_exact_chunk_size_message() {
        let message = vec![0xAAu8; 250];
        let chunks = plan_chunks(PATH, &message, 250, &[]).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(&chunks[1][..], message.as_slice());
    }

    #[test]
    fn test_message_split_in_order() {
        let message: Vec<u8> = (0..=9).collect();
        let chunks = plan_chunks(PATH, &message, 4, &[]).unwrap();

        assert_eq!(chunks.len(), 4);
        assert_eq!(&chunks[1][..], &[0, 1, 2, 3]);
        assert_eq!(&chunks[2][..], &[4, 5, 6, 7]);
        assert_eq!(&chunks[3][..], &[8, 9]);

        let joined: Vec<u8> = chunks[1..].iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(joined, message);
    }

    #[test]
    fn test_path_errors_propagate() {
        assert_eq!(
            plan_chunks("44'/461'", &[1, 2], 250, &[]).unwrap_err(),
            Error::InvalidPathPrefix
        );
        assert!(matches!(
            plan_chunks("m/44'/461'", &[1, 2], 250, &[5]),
            Err(Error::InvalidPathLength { length: 2, .. })
        ));
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        assert_eq!(
            plan_chunks("m/44'/0'", &[1, 2, 3], 0, &[]).unwrap_err(),
            Error::InvalidConfig("chunk size must be greater than zero")
        );
        // checked before the path
        assert!(matches!(
            plan_chunks("44'/0'", &[1, 2, 3], 0, &[]),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_payload_type_positions() {
        assert_eq!(PayloadType::for_position(1, 3), PayloadType::Init);
        assert_eq!(PayloadType::for_position(2, 3), PayloadType::Add);
        assert_eq!(PayloadType::for_position(3, 3), PayloadType::Last);
        assert_eq!(PayloadType::for_position(1, 1), PayloadType::Last);
        assert_eq!(u8::from(PayloadType::Add), 0x01);
        assert_eq!(PayloadType::Init.to_string(), "INIT");
    }
}
