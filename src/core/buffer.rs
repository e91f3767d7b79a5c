//! # Segmented Buffer
//!
//! An ordered chain of fixed-capacity [`Chunk`]s forming one logical byte
//! sequence, open for removal at both ends.
//!
//! ## Layout
//! Chunks live in an arena of slots and link to each other through
//! [`ChunkId`]s. The buffer owns every slot, so releasing a chunk in the middle
//! of a removal can never leave a dangling neighbour behind. Released slots
//! drop their storage and are recycled by later allocations.
//!
//! ```text
//! head                                      tail
//!  [ ..xxxx ] <-> [ xxxxxx ] <-> [ xxxxxx ] <-> [ xx.... ]
//! ```
//!
//! ## Chunk lifecycle
//! - The first chunk is created by the first append.
//! - A new chunk is linked after the tail only when the tail is full.
//! - An empty chunk at either end is released when a removal reaches it,
//!   unless it is the only chunk left, which is kept and rewound in place.
//!
//! Every operation is O(1) amortized; bytes are never moved between chunks.

use std::sync::Arc;

use tracing::{debug, trace};

use super::chunk::{Chunk, ChunkId};
use crate::config::{PacketConfig, DEFAULT_CHUNK_CAPACITY};
use crate::error::{constants, PacketError, Result};
use crate::utils::metrics::{global_metrics, BufferMetrics};

/// Chain of chunks with head/tail access
pub struct SegmentedBuffer {
    slots: Vec<Option<Chunk>>,
    vacant: Vec<usize>,
    head: Option<ChunkId>,
    tail: Option<ChunkId>,
    chunk_count: usize,
    chunk_capacity: usize,
    metrics: Arc<BufferMetrics>,
}

impl SegmentedBuffer {
    /// Create an empty buffer with the default chunk capacity
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_CHUNK_CAPACITY, global_metrics())
    }

    /// Create an empty buffer after validating `config`
    pub fn with_config(config: &PacketConfig, metrics: Arc<BufferMetrics>) -> Result<Self> {
        config.validate_strict()?;
        Ok(Self::from_parts(config.chunk_capacity, metrics))
    }

    pub(crate) fn from_parts(chunk_capacity: usize, metrics: Arc<BufferMetrics>) -> Self {
        debug_assert!(chunk_capacity > 0, "{}", constants::ERR_ZERO_CHUNK_CAPACITY);
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            head: None,
            tail: None,
            chunk_count: 0,
            chunk_capacity,
            metrics,
        }
    }

    /// Number of chunks currently in the chain
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Bytes per chunk
    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Metrics handle this buffer reports into
    pub fn metrics(&self) -> &Arc<BufferMetrics> {
        &self.metrics
    }

    /// First chunk of the chain
    pub fn head(&self) -> Option<ChunkId> {
        self.head
    }

    /// Last chunk of the chain
    pub fn tail(&self) -> Option<ChunkId> {
        self.tail
    }

    /// Look up a chunk by id
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn chunk_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Append one byte at the end of the chain
    pub fn append(&mut self, byte: u8) {
        let tail = self.tail;
        if let Some(chunk) = tail.and_then(|id| self.chunk_mut(id)) {
            if chunk.try_append(byte) {
                return;
            }
        }

        let id = self.link_new_tail();
        let appended = self
            .chunk_mut(id)
            .map_or(false, |chunk| chunk.try_append(byte));
        assert!(appended, "{}", constants::ERR_FRESH_CHUNK_FULL);
    }

    /// Remove the last byte of the chain
    pub fn remove_from_tail(&mut self) -> Result<u8> {
        loop {
            let tail_id = self.tail.ok_or_else(empty_buffer)?;
            let chunk = self.chunk_mut(tail_id).ok_or_else(empty_buffer)?;
            if let Some(byte) = chunk.remove_from_tail() {
                return Ok(byte);
            }

            let prev = chunk.prev;
            if self.head == Some(tail_id) {
                debug!(end = "tail", "{}", constants::ERR_EMPTY_BUFFER);
                return Err(empty_buffer());
            }

            self.release(tail_id);
            self.tail = prev;
            if let Some(new_tail) = prev.and_then(|id| self.chunk_mut(id)) {
                new_tail.next = None;
            }
        }
    }

    /// Remove the first byte of the chain
    pub fn remove_from_head(&mut self) -> Result<u8> {
        loop {
            let head_id = self.head.ok_or_else(empty_buffer)?;
            let chunk = self.chunk_mut(head_id).ok_or_else(empty_buffer)?;
            if let Some(byte) = chunk.remove_from_head() {
                return Ok(byte);
            }

            let next = chunk.next;
            if self.tail == Some(head_id) {
                debug!(end = "head", "{}", constants::ERR_EMPTY_BUFFER);
                return Err(empty_buffer());
            }

            self.release(head_id);
            self.head = next;
            if let Some(new_head) = next.and_then(|id| self.chunk_mut(id)) {
                new_head.prev = None;
            }
        }
    }

    /// Iterate over the live bytes of each chunk, head to tail
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            buffer: self,
            cursor: self.head,
        }
    }

    /// Count live bytes by walking the chain
    pub fn live_bytes_scan(&self) -> usize {
        self.segments().map(<[u8]>::len).sum()
    }

    /// Count chunks by walking the chain
    pub fn chunk_scan(&self) -> usize {
        self.segments().count()
    }

    /// Release every chunk and the buffer itself
    pub fn free(self) {
        trace!(chunks = self.chunk_count, "Freeing buffer");
        drop(self);
    }

    fn link_new_tail(&mut self) -> ChunkId {
        let prev_tail = self.tail;
        let mut chunk = Chunk::new(self.chunk_capacity);
        chunk.prev = prev_tail;

        let id = match self.vacant.pop() {
            Some(index) => {
                self.slots[index] = Some(chunk);
                ChunkId(index)
            }
            None => {
                self.slots.push(Some(chunk));
                ChunkId(self.slots.len() - 1)
            }
        };

        match prev_tail {
            Some(old_id) => {
                if let Some(old_tail) = self.chunk_mut(old_id) {
                    old_tail.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.chunk_count += 1;
        self.metrics.chunk_allocated();

        trace!(
            slot = id.0,
            chunks = self.chunk_count,
            capacity = self.chunk_capacity,
            "Allocated chunk"
        );
        id
    }

    fn release(&mut self, id: ChunkId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            if slot.take().is_some() {
                self.vacant.push(id.0);
                self.chunk_count -= 1;
                self.metrics.chunks_released(1);
                trace!(slot = id.0, chunks = self.chunk_count, "Released empty chunk");
            }
        }
    }

    fn release_all(&mut self) {
        let mut released = 0u64;
        let mut cursor = self.head.take();
        while let Some(id) = cursor {
            cursor = self
                .slots
                .get_mut(id.0)
                .and_then(Option::take)
                .and_then(|chunk| {
                    released += 1;
                    chunk.next
                });
        }

        self.tail = None;
        self.chunk_count = 0;
        self.slots.clear();
        self.vacant.clear();
        if released > 0 {
            self.metrics.chunks_released(released);
        }
    }
}

impl Default for SegmentedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SegmentedBuffer {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl std::fmt::Debug for SegmentedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentedBuffer")
            .field("chunk_count", &self.chunk_count)
            .field("chunk_capacity", &self.chunk_capacity)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

/// Iterator over live byte runs, one per chunk
pub struct Segments<'a> {
    buffer: &'a SegmentedBuffer,
    cursor: Option<ChunkId>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.buffer.chunk(self.cursor?)?;
        self.cursor = chunk.next;
        Some(chunk.as_slice())
    }
}

fn empty_buffer() -> PacketError {
    PacketError::Underflow {
        requested: 1,
        available: 0,
    }
}
