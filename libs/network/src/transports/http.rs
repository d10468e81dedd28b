//! HTTP transport
//!
//! `reqwest` client posting to `{endpoint}{path}`. Per-request and connect
//! timeouts come from configuration; connection pooling and TLS are
//! reqwest's.

use super::{MetricsTracker, Transport, TransportMetrics, TransportResponse};
use crate::signer::RequestHeaders;
use crate::{Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::{Duration, Instant};
use tablestore_config::{headers, ClientConfig};
use tracing::{debug, warn};

/// Production [`Transport`] over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    request_timeout: Duration,
    metrics: MetricsTracker,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                TransportError::configuration(format!("Failed to build HTTP client: {e}"), None)
            })?;

        Ok(Self {
            client,
            endpoint,
            request_timeout,
            metrics: MetricsTracker::new(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.endpoint,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn metrics(&self) -> TransportMetrics {
        self.metrics.get_snapshot()
    }

    fn map_error(&self, path: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::timeout(format!("POST {path}"), self.request_timeout.as_millis() as u64)
        } else if error.is_connect() {
            TransportError::connection_with_source("Failed to connect", &self.endpoint, error)
        } else if error.is_builder() {
            TransportError::protocol_with_source(format!("Invalid request for {path}"), error)
        } else {
            TransportError::network_with_source(format!("POST {path} failed"), error)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        path: &str,
        body: Bytes,
        request_headers: &RequestHeaders,
    ) -> Result<TransportResponse> {
        let url = format!("{}{}", self.endpoint, path);
        let bytes_sent = body.len();

        let mut request = self.client.post(&url).body(body);
        for (name, value) in request_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_error();
                let error = self.map_error(path, e);
                warn!(url = %url, category = error.category(), error = %error, "Request failed");
                return Err(error);
            }
        };

        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get(headers::REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await.map_err(|e| {
            self.metrics.record_error();
            self.map_error(path, e)
        })?;

        let latency = started.elapsed();
        self.metrics.record_request(bytes_sent, body.len(), latency);
        debug!(
            url = %url,
            status,
            request_id = request_id.as_deref().unwrap_or("-"),
            bytes_sent,
            bytes_received = body.len(),
            latency_ms = latency.as_millis() as u64,
            "Round trip complete"
        );

        Ok(TransportResponse {
            status,
            request_id,
            body,
        })
    }
}
