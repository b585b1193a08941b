//! Bounds-checked growable byte buffer with independent read and write offsets
//!
//! Reads never return partial data: a read or skip that would run past the end
//! fails with [`Error::BufferUnderrun`] and leaves the read offset untouched.
//! Writes past the current end grow the buffer, zero-filling any gap. A write
//! whose end cannot be represented fails with [`Error::InvalidOffset`].

use bytes::{Bytes, BytesMut};

use crate::{Error, Result};

/// Growable byte buffer with a read offset and a write offset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    buffer: BytesMut,
    read_offset: usize,
    write_offset: usize,
}

impl ByteCursor {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cursor over a copy of `data`
    ///
    /// The read offset starts at zero and the write offset at the end of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            buffer: BytesMut::from(data),
            read_offset: 0,
            write_offset: data.len(),
        }
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.buffer.len() => Ok(()),
            _ => Err(Error::BufferUnderrun {
                offset,
                requested: len,
                capacity: self.buffer.len(),
            }),
        }
    }

    /// Read `len` bytes at the read offset and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8]> {
        self.check_range(self.read_offset, len)?;
        let start = self.read_offset;
        self.read_offset += len;
        Ok(&self.buffer[start..start + len])
    }

    /// Read `len` bytes starting at `offset` without moving the read offset
    pub fn read_bytes_at(&self, len: usize, offset: usize) -> Result<&[u8]> {
        self.check_range(offset, len)?;
        Ok(&self.buffer[offset..offset + len])
    }

    /// Advance the read offset by `len` bytes
    pub fn skip_bytes(&mut self, len: usize) -> Result<()> {
        self.check_range(self.read_offset, len)?;
        self.read_offset += len;
        Ok(())
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a big-endian `u16`
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a big-endian `u32`
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Append a byte at the write offset
    pub fn append_u8(&mut self, value: u8) -> Result<()> {
        self.append_bytes(&[value])
    }

    /// Append a little-endian `u16` at the write offset
    pub fn append_u16(&mut self, value: u16) -> Result<()> {
        self.append_bytes(&value.to_le_bytes())
    }

    /// Append a little-endian `u32` at the write offset
    pub fn append_u32(&mut self, value: u32) -> Result<()> {
        self.append_bytes(&value.to_le_bytes())
    }

    /// Append a little-endian `u64` at the write offset
    pub fn append_u64(&mut self, value: u64) -> Result<()> {
        self.append_bytes(&value.to_le_bytes())
    }

    /// Write `data` at the write offset and advance it
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_bytes_at(data, self.write_offset)
    }

    /// End of a write of `len` bytes at `offset`, bounded by the largest
    /// allocation a buffer can hold
    fn write_end(&self, offset: usize, len: usize) -> Result<usize> {
        offset
            .checked_add(len)
            .filter(|&end| end <= isize::MAX as usize)
            .ok_or(Error::InvalidOffset {
                offset,
                capacity: self.buffer.len(),
            })
    }

    /// Splice `data` into the buffer at `offset`, shifting later bytes right
    ///
    /// An offset past the end zero-fills the gap before inserting. The write
    /// offset is not adjusted.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOffset`] if the resulting length overflows.
    pub fn insert_bytes_at(&mut self, data: &[u8], offset: usize) -> Result<()> {
        if offset > self.buffer.len() {
            self.write_end(offset, data.len())?;
            self.buffer.resize(offset, 0);
            self.buffer.extend_from_slice(data);
        } else {
            self.write_end(self.buffer.len(), data.len())?;
            let tail = self.buffer.split_off(offset);
            self.buffer.extend_from_slice(data);
            self.buffer.unsplit(tail);
        }
        Ok(())
    }

    /// Overwrite bytes starting at `offset` and move the write offset past them
    ///
    /// # Errors
    /// Returns [`Error::InvalidOffset`] if `offset + data.len()` overflows.
    pub fn write_bytes_at(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let end = self.write_end(offset, data.len())?;
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[offset..end].copy_from_slice(data);
        self.write_offset = end;
        Ok(())
    }

    /// Reset both offsets to zero
    pub const fn reset_offset(&mut self) {
        self.read_offset = 0;
        self.write_offset = 0;
    }

    /// Reset only the read offset
    pub const fn reset_read_offset(&mut self) {
        self.read_offset = 0;
    }

    /// Discard the contents and reset both offsets
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.reset_offset();
    }

    /// Borrow the whole buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Copy of the whole buffer
    pub fn complete_buffer(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer)
    }

    /// Copy of the bytes from the read offset to the end
    pub fn available_buffer(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer[self.read_offset..])
    }

    /// Number of unread bytes
    pub fn length(&self) -> usize {
        self.buffer.len() - self.read_offset
    }

    /// Check if no unread bytes remain
    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Total buffer length regardless of offsets
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current read offset
    pub const fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// Current write offset
    pub const fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// Move the read offset, which may not exceed the buffer length
    pub fn set_read_offset(&mut self, offset: usize) -> Result<()> {
        if offset > self.buffer.len() {
            return Err(Error::InvalidOffset {
                offset,
                capacity: self.buffer.len(),
            });
        }
        self.read_offset = offset;
        Ok(())
    }

    /// Move the write offset, which may not exceed the buffer length
    pub fn set_write_offset(&mut self, offset: usize) -> Result<()> {
        if offset > self.buffer.len() {
            return Err(Error::InvalidOffset {
                offset,
                capacity: self.buffer.len(),
            });
        }
        self.write_offset = offset;
        Ok(())
    }
}

impl From<&[u8]> for ByteCursor {
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

impl From<Bytes> for ByteCursor {
    fn from(data: Bytes) -> Self {
        Self::from_slice(&data)
    }
}

impl AsRef<[u8]> for ByteCursor {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}
