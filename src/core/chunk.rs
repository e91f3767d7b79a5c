//! # Chunk
//!
//! Fixed-capacity byte segment with a head and a tail cursor.
//!
//! Bytes in `[head, tail)` are live. Bytes outside that window may hold stale
//! data from earlier use and are never read. A chunk knows its neighbours by
//! [`ChunkId`] only; the owning [`SegmentedBuffer`](super::buffer::SegmentedBuffer)
//! holds every chunk and decides when one is created or released.

/// Index of a chunk slot inside its buffer's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub(crate) usize);

impl ChunkId {
    /// Raw slot index
    pub fn index(self) -> usize {
        self.0
    }
}

/// A contiguous run of bytes with bounded capacity
#[derive(Debug)]
pub struct Chunk {
    storage: Box<[u8]>,
    head: usize,
    tail: usize,
    pub(crate) prev: Option<ChunkId>,
    pub(crate) next: Option<ChunkId>,
}

impl Chunk {
    /// Allocate an empty, unlinked chunk
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            prev: None,
            next: None,
        }
    }

    /// Total bytes this chunk can hold
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of live bytes
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    /// Whether no live bytes remain
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Whether the tail cursor reached capacity
    pub fn is_full(&self) -> bool {
        self.tail == self.storage.len()
    }

    /// Head cursor offset
    pub fn head_offset(&self) -> usize {
        self.head
    }

    /// Tail cursor offset
    pub fn tail_offset(&self) -> usize {
        self.tail
    }

    /// Live bytes in order
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.head..self.tail]
    }

    /// Previous chunk in the chain
    pub fn prev(&self) -> Option<ChunkId> {
        self.prev
    }

    /// Next chunk in the chain
    pub fn next(&self) -> Option<ChunkId> {
        self.next
    }

    /// Append one byte at the tail cursor.
    ///
    /// A drained chunk rewinds both cursors to zero first, so a single chunk
    /// that is filled and emptied repeatedly never needs a successor. Returns
    /// `false` without touching the chunk when it is full.
    pub fn try_append(&mut self, byte: u8) -> bool {
        if self.is_empty() {
            self.head = 0;
            self.tail = 0;
        }

        if self.tail == self.storage.len() {
            return false;
        }

        self.storage[self.tail] = byte;
        self.tail += 1;
        true
    }

    /// Remove the last live byte, or `None` when empty
    pub fn remove_from_tail(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        self.tail -= 1;
        Some(self.storage[self.tail])
    }

    /// Remove the first live byte, or `None` when empty
    pub fn remove_from_head(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.storage[self.head];
        self.head += 1;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_until_full() {
        let mut chunk = Chunk::new(3);
        assert!(chunk.try_append(1));
        assert!(chunk.try_append(2));
        assert!(chunk.try_append(3));
        assert!(chunk.is_full());

        assert!(!chunk.try_append(4));
        assert_eq!(chunk.as_slice(), &[1, 2, 3]);
        assert_eq!(chunk.tail_offset(), 3);
    }

    #[test]
    fn test_remove_from_both_ends() {
        let mut chunk = Chunk::new(4);
        for b in [10, 20, 30, 40] {
            chunk.try_append(b);
        }

        assert_eq!(chunk.remove_from_head(), Some(10));
        assert_eq!(chunk.remove_from_tail(), Some(40));
        assert_eq!(chunk.as_slice(), &[20, 30]);
        assert_eq!(chunk.head_offset(), 1);
        assert_eq!(chunk.tail_offset(), 3);
    }

    #[test]
    fn test_empty_chunk_yields_nothing() {
        let mut chunk = Chunk::new(2);
        assert_eq!(chunk.remove_from_tail(), None);
        assert_eq!(chunk.remove_from_head(), None);
        assert_eq!(chunk.head_offset(), 0);
        assert_eq!(chunk.tail_offset(), 0);
    }

    #[test]
    fn test_drained_chunk_rewinds_on_append() {
        let mut chunk = Chunk::new(2);
        chunk.try_append(1);
        chunk.try_append(2);
        assert_eq!(chunk.remove_from_head(), Some(1));
        assert_eq!(chunk.remove_from_head(), Some(2));
        assert!(chunk.is_empty());
        assert!(chunk.is_full());

        // Full by cursor but drained, so the space is reclaimed
        assert!(chunk.try_append(7));
        assert_eq!(chunk.head_offset(), 0);
        assert_eq!(chunk.tail_offset(), 1);
        assert_eq!(chunk.as_slice(), &[7]);
    }

    #[test]
    fn test_partially_shifted_full_chunk_rejects() {
        let mut chunk = Chunk::new(2);
        chunk.try_append(1);
        chunk.try_append(2);
        chunk.remove_from_head();

        assert!(!chunk.try_append(3));
        assert_eq!(chunk.as_slice(), &[2]);
    }
}
