use super::MidiContainer;
use crate::reader::{ReadResult, ReaderError};
use alloc::{collections::VecDeque, vec::Vec};

/// A container that pushes each byte at the head.
///
/// The newest byte sits at the front of the storage, so reads walk it from the
/// back towards the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiList {
    bytes: VecDeque<u8>,
    position: usize,
}

impl From<Vec<u8>> for MidiList {
    fn from(bytes: Vec<u8>) -> Self {
        let mut list = Self::default();
        for byte in bytes {
            list.put(byte);
        }
        list
    }
}

impl MidiContainer for MidiList {
    fn put(&mut self, byte: u8) {
        self.bytes.push_front(byte);
    }

    fn get(&mut self) -> ReadResult<u8> {
        if self.done() {
            return Err(ReaderError::oob(self.position));
        }
        let index = self.bytes.len() - 1 - self.position;
        self.position += 1;
        Ok(self.bytes[index])
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

#[test]
fn list_reads_in_write_order() {
    let mut list = MidiList::default();
    for byte in [1, 2, 3] {
        list.put(byte);
    }
    assert_eq!(list.bytes, [3, 2, 1]);
    assert_eq!(list.get().unwrap(), 1);
    assert_eq!(list.get().unwrap(), 2);
    assert_eq!(list.get().unwrap(), 3);
    assert!(list.done());
    assert!(list.get().unwrap_err().is_out_of_bounds());

    list.position_reset();
    assert_eq!(list.get().unwrap(), 1);

    list.clear();
    assert!(list.done());
    assert_eq!(list.size(), 0);
}
