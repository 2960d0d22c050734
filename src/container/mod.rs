#![doc = r#"
Byte storage for a single MIDI track.

# Overview

A [`MidiContainer`] is a first-in first-out byte stream. The track fill engine
pushes bytes with [`MidiContainer::put`], and a file writer (or
[`parse_track`](crate::reader::parse_track)) drains them with
[`MidiContainer::get`] until [`MidiContainer::done`] returns true.

Two storage strategies are provided and are interchangeable:

- [`MidiVector`] appends every byte at the tail and reads from the front.
- [`MidiList`] pushes every byte at the head, so its storage is reversed, and
  reads from the back.

Callers see the same bytes in the same order from both.

# Primitive encoders

The provided methods write the three number shapes used in a track chunk:

| method                              | shape                                   |
|-------------------------------------|-----------------------------------------|
| [`add_variable`](MidiContainer::add_variable) | 1-4 byte variable-length quantity |
| [`add_long`](MidiContainer::add_long)         | 32-bit big endian                 |
| [`add_short`](MidiContainer::add_short)       | 16-bit big endian                 |

Each has a matching `read_*` method that consumes the same shape.
"#]

mod list;
pub use list::*;

mod vector;
pub use vector::*;

use crate::{
    ParseError,
    reader::{ReadResult, ReaderError},
};
use alloc::vec::Vec;

/// The largest value a four byte variable-length quantity can hold.
pub const MAX_VARIABLE: u32 = 0x0FFF_FFFF;

#[doc = r#"
A sequential byte buffer holding one track chunk body.

Implementors only provide storage. Every encoder and decoder is a provided
method built on `put` and `get`.
"#]
pub trait MidiContainer {
    /// Append one byte to the logical stream.
    fn put(&mut self, byte: u8);

    /// Return the next unread byte and advance the read position.
    ///
    /// Reading past the last byte is an [`OutOfBounds`](crate::reader::ReaderErrorKind::OutOfBounds) error.
    fn get(&mut self) -> ReadResult<u8>;

    /// Total number of bytes written.
    fn size(&self) -> usize;

    /// True once every written byte has been read.
    fn done(&self) -> bool;

    /// Drop all bytes and rewind the read position.
    fn clear(&mut self);

    /// The number of bytes read so far.
    fn position(&self) -> usize;

    /// Rewind the read position to the first byte.
    fn position_reset(&mut self);

    /// True if nothing has been written.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Write a variable-length quantity, seven bits per byte, most significant first.
    ///
    /// Values above [`MAX_VARIABLE`] are truncated to their low 28 bits.
    fn add_variable(&mut self, value: u32) {
        let mut value = value & MAX_VARIABLE;
        let mut buffer = value & 0x7F;
        value >>= 7;
        while value > 0 {
            buffer <<= 8;
            buffer |= (value & 0x7F) | 0x80;
            value >>= 7;
        }
        loop {
            self.put((buffer & 0xFF) as u8);
            if buffer & 0x80 != 0 {
                buffer >>= 8;
            } else {
                break;
            }
        }
    }

    /// Write four bytes, most significant first.
    fn add_long(&mut self, value: u32) {
        for byte in value.to_be_bytes() {
            self.put(byte);
        }
    }

    /// Write two bytes, most significant first.
    fn add_short(&mut self, value: u16) {
        for byte in value.to_be_bytes() {
            self.put(byte);
        }
    }

    /// Write every byte of a slice.
    fn add_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put(byte);
        }
    }

    /// Read a variable-length quantity of at most four bytes.
    fn read_variable(&mut self) -> ReadResult<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let byte = self.get()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::parse_error(
            self.position(),
            ParseError::VariableLength,
        ))
    }

    /// Read a 32-bit big endian value.
    fn read_long(&mut self) -> ReadResult<u32> {
        let mut bytes = [0; 4];
        for byte in &mut bytes {
            *byte = self.get()?;
        }
        Ok(u32::from_be_bytes(bytes))
    }

    /// Read a 16-bit big endian value.
    fn read_short(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes([self.get()?, self.get()?]))
    }

    /// Read `len` bytes.
    ///
    /// Fails without consuming anything if fewer than `len` bytes remain.
    fn read_bytes(&mut self, len: usize) -> ReadResult<Vec<u8>> {
        if self.position() + len > self.size() {
            return Err(ReaderError::oob(self.size()));
        }
        (0..len).map(|_| self.get()).collect()
    }
}

/// Number of bytes [`MidiContainer::add_variable`] writes for `value`.
pub const fn variable_len(value: u32) -> usize {
    match value & MAX_VARIABLE {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

/// Drain a filled container into `out` as a complete `MTrk` chunk.
///
/// The read position is rewound first, so the whole body is written.
pub fn write_track_chunk<C: MidiContainer>(container: &mut C, out: &mut Vec<u8>) -> ReadResult<()> {
    container.position_reset();
    out.extend_from_slice(b"MTrk");
    out.extend_from_slice(&(container.size() as u32).to_be_bytes());
    out.reserve(container.size());
    while !container.done() {
        out.push(container.get()?);
    }
    Ok(())
}
