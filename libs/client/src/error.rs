//! Client Error Types
//!
//! The public failure taxonomy of a row read. Lower layers report in their
//! own terms (`ValidationError`, `CodecError`, `TransportError`); the
//! conversions here fold them into the five cases a caller acts on.

use tablestore_codec::CodecError;
use tablestore_network::TransportError;
use tablestore_types::ValidationError;
use thiserror::Error;

/// Failure of one client call
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request is malformed or does not fit the message schema
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The response could not be decoded
    #[error("Malformed response: {0}")]
    Decode(CodecError),

    /// The server rejected the request
    #[error("Tablestore error ({status} {code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// The request never produced a response
    #[error(transparent)]
    Transport(TransportError),

    /// Bad settings or schema definition files
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Server error code for `Remote` failures
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether a caller-side retry could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote { status, .. } => *status >= 500,
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<CodecError> for ClientError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Validation(e) => Self::Validation(e),
            e if e.is_schema_error() => Self::config(e.to_string()),
            e => Self::Decode(e),
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Remote {
                status,
                code,
                message,
                request_id,
            } => Self::Remote {
                status,
                code,
                message,
                request_id,
            },
            TransportError::Codec(e) => e.into(),
            TransportError::Configuration { message, .. } => Self::Config { message },
            e => Self::Transport(e),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;
