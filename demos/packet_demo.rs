//! Fills a packet with a repeated line and reports how it is laid out.
//!
//! Run with `cargo run --example packet_demo`. Set `RUST_LOG=trace` to see
//! chunk allocation events.

use packet_stream::config::StreamConfig;
use packet_stream::utils::logging::init_logging;
use packet_stream::utils::metrics::{BufferMetrics, Timer};
use packet_stream::{Packet, Result};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let config = StreamConfig::from_env()?;
    config.validate_strict()?;
    init_logging(&config.logging);

    let metrics = Arc::new(BufferMetrics::new());
    let mut packet = Packet::with_metrics(&config.packet, metrics.clone())?;

    {
        let _timer = Timer::start("fill");
        for _ in 0..2048 {
            packet.append_string("abc\n");
        }
    }

    println!("NodeSize: {}", packet.chunk_count());
    println!("DataSize: {}", packet.data_size());

    let head = packet.cat_string(4104)?;
    println!("{}", String::from_utf8_lossy(&head));
    info!(copied = head.len(), remaining = packet.data_size(), "Read head without consuming");

    packet.free();
    metrics.log_metrics();
    Ok(())
}
