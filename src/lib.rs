//! # packet-stream
//!
//! Segmented, double-ended byte packet for encoding and decoding big-endian
//! binary protocol data.
//!
//! A [`Packet`] stores its bytes in a chain of fixed-capacity chunks, so it
//! grows without reallocating and copying what is already written. Values are
//! appended at the tail and read back from either end: `shift_*` consumes from
//! the head in write order, `pop_*` consumes from the tail in reverse.
//!
//! ## Modules
//! - [`core`]: chunk, segmented buffer and typed packet
//! - [`config`]: TOML/env configuration with validation
//! - [`error`]: error type and result alias
//! - [`transport`]: transport environment and TCP connection helpers
//! - [`utils`]: logging setup and metrics
//!
//! ## Quick Start
//! ```rust
//! use packet_stream::Packet;
//!
//! let mut packet = Packet::new();
//! packet.append_u8(0x01);
//! packet.append_u32(0xCAFE_F00D);
//! packet.append_string("payload");
//!
//! assert_eq!(packet.shift_u8().unwrap(), 0x01);
//! assert_eq!(packet.shift_u32().unwrap(), 0xCAFE_F00D);
//! assert_eq!(packet.data_size(), 7);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod core;
pub mod error;
pub mod transport;
pub mod utils;

pub use crate::core::buffer::SegmentedBuffer;
pub use crate::core::chunk::{Chunk, ChunkId};
pub use crate::core::packet::Packet;
pub use crate::error::{PacketError, Result};
