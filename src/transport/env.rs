//! Transport environment readiness.
//!
//! Socket creation requires the platform networking environment to be ready.
//! [`TransportEnvironment::prepare`] performs that setup once per process and
//! hands back a token; the socket helpers take the token by reference, so a
//! connection cannot be attempted before preparation has succeeded.

use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::{PacketError, Result};

static READY: OnceCell<()> = OnceCell::new();

/// Proof that the transport environment has been prepared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportEnvironment {
    _ready: (),
}

impl TransportEnvironment {
    /// Prepare the environment. Repeated calls are no-ops.
    pub fn prepare() -> Result<Self> {
        READY.get_or_try_init(|| -> Result<()> {
            // The standard library brings up the platform socket layer lazily,
            // so there is nothing further to initialize here.
            info!(platform = std::env::consts::OS, "Transport environment prepared");
            Ok(())
        })?;
        Ok(Self { _ready: () })
    }

    /// Token for an environment prepared earlier
    pub fn current() -> Result<Self> {
        if Self::is_prepared() {
            Ok(Self { _ready: () })
        } else {
            Err(PacketError::TransportNotReady)
        }
    }

    /// Whether [`prepare`](Self::prepare) has completed in this process
    pub fn is_prepared() -> bool {
        READY.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_is_idempotent() {
        let first = TransportEnvironment::prepare().unwrap();
        let second = TransportEnvironment::prepare().unwrap();
        assert_eq!(first, second);
        assert!(TransportEnvironment::is_prepared());
        assert!(TransportEnvironment::current().is_ok());
    }
}
