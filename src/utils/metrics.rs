//! Observability and Metrics
//!
//! Counters describing chunk lifecycle and byte traffic through packets.
//!
//! Every packet reports into a shared [`BufferMetrics`] handle. Packets built
//! with [`crate::Packet::new`] share the process-wide instance returned by
//! [`global_metrics`]; a packet built with [`crate::Packet::with_metrics`]
//! reports into its own handle, which is how allocation tracking is observed
//! in isolation.
//!
//! Uses atomic counters so handles can be shared freely between owners.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for packet and chunk operations
#[derive(Debug)]
pub struct BufferMetrics {
    /// Chunks allocated over the collector's lifetime
    pub chunks_allocated: AtomicU64,
    /// Chunks released over the collector's lifetime
    pub chunks_released: AtomicU64,
    /// Bytes appended to packets
    pub bytes_appended: AtomicU64,
    /// Bytes removed from packets by pop or shift
    pub bytes_removed: AtomicU64,
    /// Reads rejected for lack of data
    pub underflows: AtomicU64,
    start_time: Instant,
}

impl BufferMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            chunks_allocated: AtomicU64::new(0),
            chunks_released: AtomicU64::new(0),
            bytes_appended: AtomicU64::new(0),
            bytes_removed: AtomicU64::new(0),
            underflows: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a chunk allocation
    pub fn chunk_allocated(&self) {
        self.chunks_allocated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` chunk releases
    pub fn chunks_released(&self, count: u64) {
        self.chunks_released.fetch_add(count, Ordering::Relaxed);
    }

    /// Record appended bytes
    pub fn bytes_appended(&self, count: u64) {
        self.bytes_appended.fetch_add(count, Ordering::Relaxed);
    }

    /// Record removed bytes
    pub fn bytes_removed(&self, count: u64) {
        self.bytes_removed.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a rejected read
    pub fn underflow(&self) {
        self.underflows.fetch_add(1, Ordering::Relaxed);
    }

    /// Chunks currently allocated and not yet released
    pub fn live_chunks(&self) -> u64 {
        let allocated = self.chunks_allocated.load(Ordering::Relaxed);
        let released = self.chunks_released.load(Ordering::Relaxed);
        allocated.saturating_sub(released)
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let chunks_allocated = self.chunks_allocated.load(Ordering::Relaxed);
        let chunks_released = self.chunks_released.load(Ordering::Relaxed);
        MetricsSnapshot {
            chunks_allocated,
            chunks_released,
            chunks_live: chunks_allocated.saturating_sub(chunks_released),
            bytes_appended: self.bytes_appended.load(Ordering::Relaxed),
            bytes_removed: self.bytes_removed.load(Ordering::Relaxed),
            underflows: self.underflows.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            chunks_allocated = snapshot.chunks_allocated,
            chunks_released = snapshot.chunks_released,
            chunks_live = snapshot.chunks_live,
            bytes_appended = snapshot.bytes_appended,
            bytes_removed = snapshot.bytes_removed,
            underflows = snapshot.underflows,
            uptime_seconds = snapshot.uptime_seconds,
            "Packet metrics snapshot"
        );
    }
}

impl Default for BufferMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub chunks_allocated: u64,
    pub chunks_released: u64,
    pub chunks_live: u64,
    pub bytes_appended: u64,
    pub bytes_removed: u64,
    pub underflows: u64,
    pub uptime_seconds: u64,
}

static METRICS: Lazy<Arc<BufferMetrics>> = Lazy::new(|| Arc::new(BufferMetrics::new()));

/// Get the process-wide metrics instance
pub fn global_metrics() -> Arc<BufferMetrics> {
    Arc::clone(&METRICS)
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Time elapsed since the timer started
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
