//! # Core Packet Components
//!
//! The segmented byte buffer and the typed packet layer built on it.
//!
//! ## Components
//! - **Chunk**: fixed-capacity byte segment with head and tail cursors
//! - **SegmentedBuffer**: chain of chunks, allocation and release policy
//! - **Packet**: big-endian integer and byte-string encoding over the chain
//!
//! ## Byte Order
//! ```text
//! append_u32(0x11223344)  ->  [0x11] [0x22] [0x33] [0x44]
//!                             head                  tail
//! shift_u32() reads 0x11 first, pop_u32() reads 0x44 first
//! ```

pub mod buffer;
pub mod chunk;
pub mod packet;
