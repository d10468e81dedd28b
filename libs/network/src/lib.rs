//! # Tablestore Network Layer
//!
//! ## Purpose
//!
//! Everything between an encoded request envelope and the raw response bytes:
//!
//! - [`signer`]: canonical `x-ots-*` header signing (HMAC-SHA1, content MD5)
//! - [`transports`]: the [`Transport`] seam and its reqwest-based
//!   [`HttpTransport`]
//! - [`rpc`]: [`RpcChannel`], which signs, sends, and maps non-200 answers to
//!   [`TransportError::Remote`] via the `ots.Error` envelope
//!
//! ## Architecture Role
//!
//! ```text
//! libs/codec ──► [network] ──► libs/client
//!  envelopes     sign + POST    orchestration
//! ```
//!
//! No retry or backoff happens here; errors carry
//! [`TransportError::is_retryable`] for a caller-side policy.

pub mod error;
pub mod rpc;
pub mod signer;
pub mod transports;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use rpc::RpcChannel;
pub use signer::{RequestHeaders, RequestSigner};
pub use transports::{HttpTransport, Transport, TransportMetrics, TransportResponse};
