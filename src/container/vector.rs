use super::MidiContainer;
use crate::reader::{ReadResult, ReaderError};
use alloc::vec::Vec;

/// A container that appends each byte at the tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiVector {
    bytes: Vec<u8>,
    position: usize,
}

impl MidiVector {
    /// Create an empty container with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            position: 0,
        }
    }

    /// The written bytes, in stream order
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for MidiVector {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes, position: 0 }
    }
}

impl MidiContainer for MidiVector {
    fn put(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    fn get(&mut self) -> ReadResult<u8> {
        let byte = *self
            .bytes
            .get(self.position)
            .ok_or(ReaderError::oob(self.position))?;
        self.position += 1;
        Ok(byte)
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn done(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn clear(&mut self) {
        self.bytes.clear();
        self.position = 0;
    }

    fn position(&self) -> usize {
        self.position
    }

    fn position_reset(&mut self) {
        self.position = 0;
    }
}
