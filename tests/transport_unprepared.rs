//! Connecting without preparing the transport environment
//!
//! Kept in its own test binary so no other test prepares the environment
//! first.

use packet_stream::transport::{connect, TransportEnvironment};
use packet_stream::PacketError;

#[tokio::test]
async fn test_connect_requires_prepared_environment() {
    assert!(!TransportEnvironment::is_prepared());
    let result = connect("127.0.0.1", 9).await;
    assert!(matches!(result, Err(PacketError::TransportNotReady)));
}
