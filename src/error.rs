//! # Error Types
//!
//! Error handling for packet encoding, decoding and the transport boundary.
//!
//! Buffer underflow is the only error the packet core can produce. It is
//! surfaced as a typed value instead of aborting, so callers decide whether
//! running dry is fatal for their use case. Every read is all-or-nothing: when
//! an underflow is reported no byte has been removed.
//!
//! ## Error Categories
//! - **Underflow**: a `pop_*`/`shift_*` asked for more bytes than are live
//! - **Configuration**: invalid or unreadable settings
//! - **Transport**: environment not prepared, name resolution, connection
//!
//! ## Example Usage
//! ```rust
//! use packet_stream::error::{PacketError, Result};
//! use packet_stream::Packet;
//!
//! fn read_port(packet: &mut Packet) -> Result<u16> {
//!     packet.shift_u16()
//! }
//!
//! let mut packet = Packet::new();
//! packet.append_u8(0x1F);
//! match read_port(&mut packet) {
//!     Err(PacketError::Underflow { requested: 2, available: 1 }) => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Buffer errors
    pub const ERR_EMPTY_BUFFER: &str = "cannot remove a byte from an empty buffer";
    pub const ERR_FRESH_CHUNK_FULL: &str = "freshly allocated chunk rejected a byte";

    /// Configuration errors
    pub const ERR_ZERO_CHUNK_CAPACITY: &str = "Chunk capacity must be greater than 0";

    /// Transport errors
    pub const ERR_NO_ADDRESS: &str = "Host resolved to no usable address";
}

// PacketError is the primary error type for all packet and transport operations
#[derive(Error, Debug)]
pub enum PacketError {
    #[error("Buffer underflow: requested {requested} bytes, {available} available")]
    Underflow { requested: usize, available: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot resolve {0}")]
    Resolve(String),

    #[error("Connection to {target} failed: {source}")]
    Connect {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("Transport environment has not been prepared")]
    TransportNotReady,

    #[error("Connection to {target} timed out")]
    Timeout { target: String },
}

impl PacketError {
    /// Whether this error reports a read past the end of the buffer
    pub fn is_underflow(&self) -> bool {
        matches!(self, PacketError::Underflow { .. })
    }
}

/// Type alias for Results using PacketError
pub type Result<T> = std::result::Result<T, PacketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underflow_display() {
        let err = PacketError::Underflow {
            requested: 4,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Buffer underflow: requested 4 bytes, 1 available"
        );
        assert!(err.is_underflow());
    }

    #[test]
    fn test_io_conversion() {
        let err: PacketError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, PacketError::Io(_)));
        assert!(!err.is_underflow());
    }

    #[test]
    fn test_timeout_names_target() {
        let err = PacketError::Timeout {
            target: "127.0.0.1:9".to_string(),
        };
        assert_eq!(err.to_string(), "Connection to 127.0.0.1:9 timed out");
    }
}
