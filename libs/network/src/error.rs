//! Transport Error Types
//!
//! Failures of one signed RPC round trip: connection-level problems, the
//! server rejecting the request, and envelopes that cannot be decoded.
//! Nothing here is retried by this crate; [`TransportError::is_retryable`]
//! only classifies errors for a caller-side retry policy.

use tablestore_codec::CodecError;
use thiserror::Error;

/// Main transport error type
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network connectivity errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Connection could not be established (refused, DNS, TLS handshake)
    #[error("Connection error: {message} (endpoint: {endpoint})")]
    Connection {
        message: String,
        endpoint: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request could not be built or the response could not be read
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Signing errors
    #[error("Security error: {message}")]
    Security { message: String },

    /// Transport timeout errors
    #[error("Timeout error: {operation} exceeded {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Server answered with a non-200 status and an error envelope
    #[error("Remote error ({status} {code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// Envelope could not be encoded or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a connection error with source
    pub fn connection_with_source(
        message: impl Into<String>,
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            endpoint: endpoint.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// Create a protocol error with source
    pub fn protocol_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Protocol {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: field.map(|s| s.to_string()),
        }
    }

    /// Create a security error
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create a remote rejection error
    pub fn remote(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        Self::Remote {
            status,
            code: code.into(),
            message: message.into(),
            request_id,
        }
    }

    /// Check if a caller-side retry could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network { .. } => true,
            TransportError::Connection { .. } => true,
            TransportError::Timeout { .. } => true,
            TransportError::Remote { status, .. } => *status >= 500,
            TransportError::Protocol { .. } => false,
            TransportError::Configuration { .. } => false,
            TransportError::Security { .. } => false,
            TransportError::Codec(_) => false,
        }
    }

    /// Check if this is a transient error
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Network { .. }
                | TransportError::Connection { .. }
                | TransportError::Timeout { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TransportError::Network { .. } => "network",
            TransportError::Connection { .. } => "connection",
            TransportError::Protocol { .. } => "protocol",
            TransportError::Configuration { .. } => "configuration",
            TransportError::Security { .. } => "security",
            TransportError::Timeout { .. } => "timeout",
            TransportError::Remote { .. } => "remote",
            TransportError::Codec(_) => "codec",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let err = TransportError::network("Connection reset");
        assert_eq!(err.category(), "network");
        assert!(err.is_retryable());
        assert!(err.is_transient());
    }

    #[test]
    fn test_remote_error_display() {
        let err = TransportError::remote(403, "OTSAuthFailed", "access denied", Some("req-1".into()));
        assert_eq!(err.to_string(), "Remote error (403 OTSAuthFailed): access denied");
        assert!(!err.is_retryable());
        assert!(TransportError::remote(503, "OTSServerBusy", "busy", None).is_retryable());
    }

    #[test]
    fn test_error_categorization() {
        assert_eq!(TransportError::protocol("test").category(), "protocol");
        assert_eq!(TransportError::timeout("POST /GetRow", 5000).category(), "timeout");
        assert_eq!(
            TransportError::from(CodecError::decode("ots.Error", "truncated")).category(),
            "codec"
        );
    }

    #[test]
    fn test_transient_errors() {
        assert!(TransportError::timeout("test", 1000).is_transient());
        assert!(!TransportError::protocol("test").is_transient());
        assert!(!TransportError::configuration("test", None).is_transient());
        assert!(!TransportError::security("test").is_transient());
    }
}
