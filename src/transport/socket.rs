//! TCP connection helper.
//!
//! Resolves a host name and port and opens a connected stream. Resolution and
//! connection failures are returned as errors; nothing here retries.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, instrument};

use super::env::TransportEnvironment;
use crate::config::{TransportConfig, DEFAULT_CONNECT_TIMEOUT};
use crate::error::{constants, PacketError, Result};

/// Remote endpoint a connection is opened against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketTarget {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl SocketTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            connect_timeout: config.connect_timeout,
        }
    }

    /// Override the per-attempt connect timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to the first usable socket address
    #[instrument(skip(self, _env), fields(host = %self.host, port = self.port))]
    pub async fn resolve(&self, _env: &TransportEnvironment) -> Result<SocketAddr> {
        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| PacketError::Resolve(format!("{}: {e}", self.host)))?;

        let addr = addrs.next().ok_or_else(|| {
            PacketError::Resolve(format!("{}: {}", self.host, constants::ERR_NO_ADDRESS))
        })?;
        debug!(%addr, "Resolved host");
        Ok(addr)
    }

    /// Resolve and open a connected stream
    #[instrument(skip(self, env), fields(host = %self.host, port = self.port))]
    pub async fn connect(&self, env: &TransportEnvironment) -> Result<TcpStream> {
        let addr = self.resolve(env).await?;

        let target = format!("{}:{}", self.host, self.port);

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| PacketError::Timeout {
                target: target.clone(),
            })?
            .map_err(|source| PacketError::Connect { target, source })?;

        debug!(%addr, "Connected");
        Ok(stream)
    }
}

/// Connect to `host:port` using the environment prepared earlier
pub async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let env = TransportEnvironment::current()?;
    SocketTarget::new(host, port).connect(&env).await
}
