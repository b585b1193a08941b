//! APDU command frames
//!
//! A command is the four header bytes (CLA, INS, P1, P2) plus a payload that
//! is sent behind a single length byte (Lc). The length byte is always
//! present, even for empty payloads.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{Error, Result};

/// Longest payload a short APDU can carry
pub const MAX_DATA_LEN: usize = u8::MAX as usize;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data, possibly empty
    pub data: Bytes,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Bytes::new(),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: data.into(),
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = data.into();
        self
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Command payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the serialized command
    pub fn command_length(&self) -> usize {
        5 + self.data.len()
    }

    /// Convert to raw APDU bytes
    ///
    /// # Errors
    /// Returns [`Error::InvalidCommandLength`] if the payload does not fit a
    /// single length byte.
    pub fn to_bytes(&self) -> Result<Bytes> {
        if self.data.len() > MAX_DATA_LEN {
            return Err(Error::InvalidCommandLength(self.data.len()));
        }

        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        buffer.put_u8(self.data.len() as u8);
        buffer.put_slice(&self.data);

        Ok(buffer.freeze())
    }

    /// Parse a command from raw bytes
    ///
    /// A bare four-byte header is accepted as a command with no data.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        if data.len() > 4 {
            let lc = data[4] as usize;
            if data.len() != 5 + lc {
                return Err(Error::InvalidCommandLength(data.len()));
            }
            command.data = Bytes::copy_from_slice(&data[5..]);
        }

        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X} {:02X} {:02X} {:02X} [{}]",
            self.cla,
            self.ins,
            self.p1,
            self.p2,
            hex::encode(&self.data)
        )
    }
}
