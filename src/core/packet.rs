//! # Packet
//!
//! Typed big-endian encoding on top of a [`SegmentedBuffer`].
//!
//! Writes always go to the tail. Reads come from either end:
//! - `shift_*` reads from the head (queue order). The first byte removed is
//!   the most significant, so a field written with `append_*` decodes
//!   correctly no matter what was appended after it.
//! - `pop_*` reads from the tail (stack order). The first byte removed is the
//!   least significant. This only reconstructs a value when it directly undoes
//!   the matching `append_*` of the same width; popping a different width over
//!   a pending field yields bytes of adjacent fields combined.
//!
//! Multi-byte operations are built from the 8-bit primitives by halving
//! (`append_u32` is two `append_u16`, and so on), and every read is
//! all-or-nothing: when fewer bytes are live than the read needs, an
//! [`PacketError::Underflow`] is returned and the packet is left untouched.
//!
//! ## Example
//! ```rust
//! use packet_stream::Packet;
//!
//! let mut packet = Packet::new();
//! packet.append_u16(0x1234);
//! packet.append_string("ok");
//!
//! assert_eq!(packet.data_size(), 4);
//! assert_eq!(packet.shift_u16().unwrap(), 0x1234);
//! assert_eq!(packet.pop_all().as_ref(), b"ok");
//! assert!(packet.shift_u8().is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use super::buffer::SegmentedBuffer;
use crate::config::{PacketConfig, DEFAULT_CHUNK_CAPACITY};
use crate::error::{PacketError, Result};
use crate::utils::metrics::{global_metrics, BufferMetrics};

/// Double-ended byte packet
pub struct Packet {
    buffer: SegmentedBuffer,
    byte_count: usize,
}

impl Packet {
    /// Create an empty packet with the default chunk capacity
    pub fn new() -> Self {
        Self {
            buffer: SegmentedBuffer::from_parts(DEFAULT_CHUNK_CAPACITY, global_metrics()),
            byte_count: 0,
        }
    }

    /// Create an empty packet whose chunks hold `chunk_capacity` bytes
    pub fn with_capacity(chunk_capacity: usize) -> Result<Self> {
        Self::with_config(&PacketConfig { chunk_capacity })
    }

    /// Create an empty packet from configuration
    pub fn with_config(config: &PacketConfig) -> Result<Self> {
        Self::with_metrics(config, global_metrics())
    }

    /// Create an empty packet reporting into its own metrics handle
    pub fn with_metrics(config: &PacketConfig, metrics: Arc<BufferMetrics>) -> Result<Self> {
        Ok(Self {
            buffer: SegmentedBuffer::with_config(config, metrics)?,
            byte_count: 0,
        })
    }

    /// Create a packet holding a copy of `data`
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut packet = Self::new();
        packet.append_string(data);
        packet
    }

    /// Live byte count
    pub fn data_size(&self) -> usize {
        self.byte_count
    }

    /// Whether no live bytes remain
    pub fn is_empty(&self) -> bool {
        self.byte_count == 0
    }

    /// Number of chunks backing the packet
    pub fn chunk_count(&self) -> usize {
        self.buffer.chunk_count()
    }

    /// Bytes per chunk
    pub fn chunk_capacity(&self) -> usize {
        self.buffer.chunk_capacity()
    }

    /// Underlying chunk chain
    pub fn buffer(&self) -> &SegmentedBuffer {
        &self.buffer
    }

    /// Release every chunk. Dropping the packet does the same.
    pub fn free(self) {
        debug!(bytes = self.byte_count, chunks = self.chunk_count(), "Freeing packet");
        self.buffer.free();
    }

    /// Append one byte at the tail
    pub fn append_u8(&mut self, value: u8) {
        self.buffer.append(value);
        self.byte_count += 1;
        self.buffer.metrics().bytes_appended(1);
    }

    /// Append a 16-bit value, most significant byte first
    pub fn append_u16(&mut self, value: u16) {
        self.append_u8((value >> 8) as u8);
        self.append_u8((value & 0xff) as u8);
    }

    /// Append a 32-bit value as two big-endian halves
    pub fn append_u32(&mut self, value: u32) {
        self.append_u16((value >> 16) as u16);
        self.append_u16((value & 0xffff) as u16);
    }

    /// Append a 64-bit value as two big-endian halves
    pub fn append_u64(&mut self, value: u64) {
        self.append_u32((value >> 32) as u32);
        self.append_u32((value & 0xffff_ffff) as u32);
    }

    /// Append raw bytes in order, with no length prefix or terminator
    pub fn append_string(&mut self, data: impl AsRef<[u8]>) {
        for &byte in data.as_ref() {
            self.append_u8(byte);
        }
    }

    /// Remove the last byte
    pub fn pop_u8(&mut self) -> Result<u8> {
        self.ensure_available(1)?;
        let byte = self.buffer.remove_from_tail()?;
        self.byte_count -= 1;
        self.buffer.metrics().bytes_removed(1);
        Ok(byte)
    }

    /// Remove a 16-bit value written by the last `append_u16`
    pub fn pop_u16(&mut self) -> Result<u16> {
        self.ensure_available(2)?;
        let low = self.pop_u8()? as u16;
        let high = self.pop_u8()? as u16;
        Ok((high << 8) | low)
    }

    /// Remove a 32-bit value written by the last `append_u32`
    pub fn pop_u32(&mut self) -> Result<u32> {
        self.ensure_available(4)?;
        let low = self.pop_u16()? as u32;
        let high = self.pop_u16()? as u32;
        Ok((high << 16) | low)
    }

    /// Remove a 64-bit value written by the last `append_u64`
    pub fn pop_u64(&mut self) -> Result<u64> {
        self.ensure_available(8)?;
        let low = self.pop_u32()? as u64;
        let high = self.pop_u32()? as u64;
        Ok((high << 32) | low)
    }

    /// Remove the first byte
    pub fn shift_u8(&mut self) -> Result<u8> {
        self.ensure_available(1)?;
        let byte = self.buffer.remove_from_head()?;
        self.byte_count -= 1;
        self.buffer.metrics().bytes_removed(1);
        Ok(byte)
    }

    /// Remove a big-endian 16-bit value from the head
    pub fn shift_u16(&mut self) -> Result<u16> {
        self.ensure_available(2)?;
        let high = self.shift_u8()? as u16;
        let low = self.shift_u8()? as u16;
        Ok((high << 8) | low)
    }

    /// Remove a big-endian 32-bit value from the head
    pub fn shift_u32(&mut self) -> Result<u32> {
        self.ensure_available(4)?;
        let high = self.shift_u16()? as u32;
        let low = self.shift_u16()? as u32;
        Ok((high << 16) | low)
    }

    /// Remove a big-endian 64-bit value from the head
    pub fn shift_u64(&mut self) -> Result<u64> {
        self.ensure_available(8)?;
        let high = self.shift_u32()? as u64;
        let low = self.shift_u32()? as u64;
        Ok((high << 32) | low)
    }

    /// Remove the last `len` bytes, returned in their original order
    pub fn pop_string(&mut self, len: usize) -> Result<Bytes> {
        self.ensure_available(len)?;
        let mut reversed = Vec::with_capacity(len);
        for _ in 0..len {
            reversed.push(self.pop_u8()?);
        }
        reversed.reverse();
        Ok(Bytes::from(reversed))
    }

    /// Remove the first `len` bytes
    pub fn shift_string(&mut self, len: usize) -> Result<Bytes> {
        self.ensure_available(len)?;
        let mut out = BytesMut::with_capacity(len);
        for _ in 0..len {
            out.put_u8(self.shift_u8()?);
        }
        Ok(out.freeze())
    }

    /// Copy the first `len` bytes without removing them
    pub fn cat_string(&self, len: usize) -> Result<Bytes> {
        self.ensure_available(len)?;
        let mut out = BytesMut::with_capacity(len);
        for segment in self.buffer.segments() {
            let take = segment.len().min(len - out.len());
            out.extend_from_slice(&segment[..take]);
            if out.len() == len {
                break;
            }
        }
        Ok(out.freeze())
    }

    /// Remove every live byte, returned in order
    pub fn pop_all(&mut self) -> Bytes {
        let len = self.byte_count;
        self.pop_string(len).unwrap_or_default()
    }

    /// Copy of the live bytes in order
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.byte_count);
        for segment in self.buffer.segments() {
            out.extend_from_slice(segment);
        }
        out.freeze()
    }

    /// Iterate over live bytes, head to tail
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.buffer.segments().flatten().copied()
    }

    /// Byte at logical position `index` counted from the head
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.byte_count {
            return None;
        }
        let mut remaining = index;
        for segment in self.buffer.segments() {
            if remaining < segment.len() {
                return Some(segment[remaining]);
            }
            remaining -= segment.len();
        }
        None
    }

    /// Bit `bit` of the byte at `index`, where bit 0 is the most significant
    pub fn get_bit(&self, index: usize, bit: u8) -> Option<bool> {
        if bit > 7 {
            return None;
        }
        self.get(index).map(|byte| byte & (0x80 >> bit) != 0)
    }

    /// Whether `needle` occurs as a contiguous run of live bytes.
    ///
    /// Scans the chunks in place, holding at most `needle.len()` bytes.
    pub fn contains(&self, needle: &[u8]) -> bool {
        if needle.is_empty() {
            return true;
        }
        if needle.len() > self.byte_count {
            return false;
        }

        let mut window = VecDeque::with_capacity(needle.len());
        for byte in self.iter() {
            if window.len() == needle.len() {
                window.pop_front();
            }
            window.push_back(byte);
            if window.len() == needle.len() && window.iter().eq(needle.iter()) {
                return true;
            }
        }
        false
    }

    fn ensure_available(&self, requested: usize) -> Result<()> {
        if self.byte_count >= requested {
            return Ok(());
        }
        self.buffer.metrics().underflow();
        debug!(requested, available = self.byte_count, "Packet underflow");
        Err(PacketError::Underflow {
            requested,
            available: self.byte_count,
        })
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Packet Length={}>", self.byte_count)
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("data_size", &self.byte_count)
            .field("chunk_count", &self.chunk_count())
            .field("chunk_capacity", &self.chunk_capacity())
            .finish()
    }
}

impl From<&[u8]> for Packet {
    fn from(data: &[u8]) -> Self {
        Self::from_bytes(data)
    }
}

impl From<&str> for Packet {
    fn from(data: &str) -> Self {
        Self::from_bytes(data.as_bytes())
    }
}

impl Extend<u8> for Packet {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for byte in iter {
            self.append_u8(byte);
        }
    }
}

impl FromIterator<u8> for Packet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut packet = Self::new();
        packet.extend(iter);
        packet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(capacity: usize) -> Packet {
        Packet::with_capacity(capacity).unwrap()
    }

    #[test]
    fn test_new_packet_is_empty() {
        let packet = Packet::new();
        assert_eq!(packet.data_size(), 0);
        assert_eq!(packet.chunk_count(), 0);
        assert!(packet.is_empty());
        assert_eq!(packet.chunk_capacity(), DEFAULT_CHUNK_CAPACITY);
    }

    #[test]
    fn test_big_endian_layout() {
        let mut packet = small(3);
        packet.append_u16(0x0102);
        packet.append_u32(0x0304_0506);
        packet.append_u64(0x0708_090a_0b0c_0d0e);

        let expected: Vec<u8> = (1..=14).collect();
        assert_eq!(packet.to_bytes().as_ref(), expected.as_slice());
        assert_eq!(packet.data_size(), 14);
    }

    #[test]
    fn test_pop_inverts_matching_append() {
        let mut packet = small(5);
        packet.append_u8(0xaa);
        packet.append_u16(0xbeef);
        packet.append_u32(0xdead_beef);
        packet.append_u64(0x0123_4567_89ab_cdef);

        assert_eq!(packet.pop_u64().unwrap(), 0x0123_4567_89ab_cdef);
        assert_eq!(packet.pop_u32().unwrap(), 0xdead_beef);
        assert_eq!(packet.pop_u16().unwrap(), 0xbeef);
        assert_eq!(packet.pop_u8().unwrap(), 0xaa);
        assert!(packet.is_empty());
    }

    #[test]
    fn test_shift_decodes_in_write_order() {
        let mut packet = small(5);
        packet.append_u16(0xbeef);
        packet.append_u64(u64::MAX - 1);
        packet.append_u32(7);

        assert_eq!(packet.shift_u16().unwrap(), 0xbeef);
        assert_eq!(packet.shift_u64().unwrap(), u64::MAX - 1);
        assert_eq!(packet.shift_u32().unwrap(), 7);
    }

    #[test]
    fn test_mixed_width_pop_combines_adjacent_fields() {
        let mut packet = Packet::new();
        packet.append_u16(0x1122);
        packet.append_u16(0x3344);

        // Narrow pop over a wider pending field: byte-level stack order
        assert_eq!(packet.pop_u8().unwrap(), 0x44);
        assert_eq!(packet.pop_u16().unwrap(), 0x2233);
        assert_eq!(packet.pop_u8().unwrap(), 0x11);
    }

    #[test]
    fn test_underflow_leaves_packet_untouched() {
        let mut packet = small(2);
        packet.append_u8(1);
        packet.append_u8(2);
        packet.append_u8(3);

        let err = packet.shift_u32().unwrap_err();
        assert!(matches!(
            err,
            PacketError::Underflow {
                requested: 4,
                available: 3
            }
        ));
        assert!(packet.pop_u64().is_err());
        assert_eq!(packet.data_size(), 3);
        assert_eq!(packet.to_bytes().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_string_reads() {
        let mut packet = Packet::from("hello, world");
        assert_eq!(packet.shift_string(5).unwrap().as_ref(), b"hello");
        assert_eq!(packet.pop_string(5).unwrap().as_ref(), b"world");
        assert_eq!(packet.pop_all().as_ref(), b", ");
        assert!(packet.is_empty());
        assert!(packet.pop_all().is_empty());
        assert!(packet.shift_string(1).is_err());
    }

    #[test]
    fn test_indexing_across_chunks() {
        let packet: Packet = {
            let mut p = small(2);
            p.extend([0x10, 0x20, 0x30, 0x40, 0x80]);
            p
        };
        assert_eq!(packet.chunk_count(), 3);
        assert_eq!(packet.get(0), Some(0x10));
        assert_eq!(packet.get(3), Some(0x40));
        assert_eq!(packet.get(5), None);
        assert_eq!(packet.get_bit(4, 0), Some(true));
        assert_eq!(packet.get_bit(4, 1), Some(false));
        assert_eq!(packet.get_bit(0, 3), Some(true));
        assert_eq!(packet.get_bit(0, 8), None);
        assert_eq!(packet.iter().collect::<Vec<_>>(), vec![0x10, 0x20, 0x30, 0x40, 0x80]);
    }

    #[test]
    fn test_contains() {
        let packet = Packet::from("GET / HTTP/1.1\r\n\r\n");
        assert!(packet.contains(b"HTTP/1.1"));
        assert!(packet.contains(b"\r\n\r\n"));
        assert!(packet.contains(b""));
        assert!(!packet.contains(b"POST"));
    }

    #[test]
    fn test_contains_across_chunk_boundary() {
        let mut packet = small(4);
        packet.append_string("abcdefgh");
        assert_eq!(packet.chunk_count(), 2);

        assert!(packet.contains(b"cdef"));
        assert!(packet.contains(b"abcdefgh"));
        assert!(!packet.contains(b"abcdefghi"));
        assert!(!packet.contains(b"dcef"));

        packet.shift_u8().unwrap();
        assert!(!packet.contains(b"abc"));
        assert!(packet.contains(b"bcde"));
    }

    #[test]
    fn test_cat_string_reads_without_consuming() {
        let mut packet = Packet::new();
        for _ in 0..2048 {
            packet.append_string("abc\n");
        }
        assert_eq!(packet.chunk_count(), 3);

        // 4104 bytes spans the first chunk and part of the second
        let head = packet.cat_string(4104).unwrap();
        assert_eq!(head.len(), 4104);
        assert!(head.chunks(4).all(|line| line == b"abc\n"));
        assert_eq!(packet.data_size(), 8192);
        assert_eq!(packet.chunk_count(), 3);

        assert_eq!(packet.cat_string(4104).unwrap(), head);
        assert_eq!(packet.shift_string(4104).unwrap(), head);
        assert_eq!(packet.data_size(), 8192 - 4104);
    }

    #[test]
    fn test_cat_string_bounds() {
        let mut packet = small(3);
        packet.append_string("abcde");
        packet.shift_u8().unwrap();

        assert_eq!(packet.cat_string(0).unwrap().len(), 0);
        assert_eq!(packet.cat_string(4).unwrap().as_ref(), b"bcde");
        assert!(matches!(
            packet.cat_string(5),
            Err(PacketError::Underflow {
                requested: 5,
                available: 4
            })
        ));
        assert_eq!(packet.data_size(), 4);
    }

    #[test]
    fn test_display() {
        let packet = Packet::from("abc");
        assert_eq!(packet.to_string(), "<Packet Length=3>");
    }
}
