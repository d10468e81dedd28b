//! # RPC Channel - Signed Calls with Error Envelope Decoding
//!
//! ## Purpose
//!
//! One authenticated call: sign the body, send it through a [`Transport`],
//! and turn a non-200 answer into a typed [`TransportError::Remote`] by
//! decoding the `ots.Error` envelope. Success returns the raw response body
//! for the caller to decode with the operation's response message.
//!
//! No retries: every failure is returned to the caller as-is.

use crate::signer::RequestSigner;
use crate::transports::{Transport, TransportResponse};
use crate::{Result, TransportError};
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tablestore_codec::{wire, MessageCodec};
use tracing::{debug, warn};

/// Signer + transport + codec for error envelopes
#[derive(Clone)]
pub struct RpcChannel {
    signer: RequestSigner,
    transport: Arc<dyn Transport>,
    codec: MessageCodec,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for RpcChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChannel")
            .field("signer", &self.signer)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RpcChannel {
    pub fn new(signer: RequestSigner, transport: Arc<dyn Transport>, codec: MessageCodec) -> Self {
        Self {
            signer,
            transport,
            codec,
            timeout: None,
        }
    }

    /// Bound every call with a deadline on top of the transport's own timeouts
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sign and POST `body` to `path`, returning the 200 response body
    pub async fn call(&self, path: &str, body: Vec<u8>) -> Result<Bytes> {
        let headers = self.signer.signed_headers(path, &body, Utc::now())?;
        let body = Bytes::from(body);

        let response = match self.timeout {
            Some(timeout) => self.transport.send_timeout(path, body, &headers, timeout).await?,
            None => self.transport.send(path, body, &headers).await?,
        };

        if response.is_success() {
            debug!(
                path,
                request_id = response.request_id.as_deref().unwrap_or("-"),
                bytes = response.body.len(),
                "RPC succeeded"
            );
            return Ok(response.body);
        }

        Err(self.remote_error(path, response))
    }

    fn remote_error(&self, path: &str, response: TransportResponse) -> TransportError {
        let envelope = match self.codec.decode::<wire::Error>(&response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    path,
                    status = response.status,
                    request_id = response.request_id.as_deref().unwrap_or("-"),
                    error = %e,
                    "Undecodable error envelope"
                );
                return TransportError::Codec(e);
            }
        };

        let code = envelope.code.unwrap_or_default();
        let message = envelope.message.unwrap_or_default();
        warn!(
            path,
            status = response.status,
            code = %code,
            message = %message,
            request_id = response.request_id.as_deref().unwrap_or("-"),
            "Request rejected by server"
        );
        TransportError::remote(response.status, code, message, response.request_id)
    }
}
