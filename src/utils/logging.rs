//! # Logging Setup
//!
//! Installs a `tracing-subscriber` formatter driven by [`LoggingConfig`].
//!
//! `RUST_LOG` takes precedence over the configured level so verbosity can be
//! raised per target without touching configuration files. Chunk allocation
//! and release are reported at `trace` level, rejected reads at `debug`.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Build the filter used by [`init_logging`]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which makes the
/// call safe to repeat from tests and binaries alike.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(app = %config.app_name, "Logging initialized");
    }
    installed
}
