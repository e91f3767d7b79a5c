//! # Utility Modules
//!
//! Supporting utilities for logging and observability.
//!
//! ## Components
//! - **Logging**: `tracing-subscriber` setup driven by configuration
//! - **Metrics**: chunk lifecycle and byte traffic counters, operation timer

pub mod logging;
pub mod metrics;

pub use metrics::{global_metrics, BufferMetrics, MetricsSnapshot};
