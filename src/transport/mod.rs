//! # Transport Collaborators
//!
//! One-time environment preparation and TCP connection setup. The packet core
//! does not depend on anything here; these helpers only open connections that
//! packets can later be written to.

pub mod env;
pub mod socket;

pub use env::TransportEnvironment;
pub use socket::{connect, SocketTarget};
