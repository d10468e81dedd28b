//! Transport Layer
//!
//! "Send bytes, get status + bytes back." The [`Transport`] trait is the seam
//! between the signed RPC channel and the wire; [`HttpTransport`] is the
//! production implementation. Connection handling, TLS and timeouts live
//! behind it; retries do not.

use crate::signer::RequestHeaders;
use crate::{Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::{Duration, Instant};

pub mod http;
pub mod metrics;

#[cfg(test)]
mod tests;

// Re-export transport types
pub use http::HttpTransport;
pub use metrics::MetricsTracker;

/// One POST round trip
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `path` with the given headers
    async fn send(
        &self,
        path: &str,
        body: Bytes,
        headers: &RequestHeaders,
    ) -> Result<TransportResponse>;

    /// Send with a caller-supplied deadline
    async fn send_timeout(
        &self,
        path: &str,
        body: Bytes,
        headers: &RequestHeaders,
        timeout: Duration,
    ) -> Result<TransportResponse> {
        tokio::time::timeout(timeout, self.send(path, body, headers))
            .await
            .map_err(|_| TransportError::timeout(format!("POST {path}"), timeout.as_millis() as u64))?
    }
}

/// Status, request id and raw body of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Value of the `x-ots-requestid` header, if sent
    pub request_id: Option<String>,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Transport performance metrics
#[derive(Debug, Clone, Default)]
pub struct TransportMetrics {
    pub requests: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub errors: u64,
    pub last_latency_ns: u64,
    pub avg_latency_ns: u64,
    pub last_activity: Option<Instant>,
}
