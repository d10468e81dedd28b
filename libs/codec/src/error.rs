//! Codec errors for PlainBuffer rows and protobuf envelopes
//!
//! Each decode failure carries enough context (offset, expected vs actual,
//! which structure was being read) to tell a truncated response apart from a
//! corrupted one or from a schema mismatch between client and server.

use tablestore_types::ValidationError;
use thiserror::Error;

/// Codec error with diagnostic context
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Schema definition file could not be read or parsed
    #[error("Schema load failed for {source_name}: {message}")]
    SchemaLoad {
        source_name: String,
        message: String,
    },

    /// Message name not present in the loaded schema set
    #[error("Unknown message type '{name}' in {namespace} schema")]
    UnknownMessage { name: String, namespace: String },

    /// Outgoing message does not conform to its schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Buffer ended before a structure was complete
    #[error("Truncated input: need {need} bytes at offset {offset}, buffer has {got} (reading: {context})")]
    Truncated {
        need: usize,
        got: usize,
        offset: usize,
        context: String,
    },

    /// PlainBuffer header is missing or wrong
    #[error("Invalid PlainBuffer header: expected {expected:#010x}, got {actual:#010x}")]
    InvalidHeader { expected: u32, actual: u32 },

    /// A different tag was found where a specific one is required
    #[error("Unexpected tag {actual:#04x} at offset {offset}: expected {expected} (reading: {context})")]
    UnexpectedTag {
        expected: String,
        actual: u8,
        offset: usize,
        context: String,
    },

    /// CRC-8 check failed for a cell or a row
    #[error("Checksum mismatch in {scope}: expected {expected:#04x}, calculated {calculated:#04x} (offset: {offset})")]
    ChecksumMismatch {
        scope: String,
        expected: u8,
        calculated: u8,
        offset: usize,
    },

    /// Variant type byte is unknown or illegal in this position
    #[error("Invalid variant type {type_code:#04x} for {position} cell '{cell}'")]
    InvalidVariantType {
        type_code: u8,
        position: String,
        cell: String,
    },

    /// Cell payload is malformed (bad length, invalid UTF-8, ...)
    #[error("Invalid cell '{cell}' at offset {offset}: {reason}")]
    InvalidCell {
        cell: String,
        offset: usize,
        reason: String,
    },

    /// Incoming protobuf envelope is malformed or violates its schema
    #[error("Decode error in {message_name}: {reason}")]
    Decode { message_name: String, reason: String },
}

impl CodecError {
    pub fn schema_load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaLoad {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn unknown_message(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::UnknownMessage {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn truncated(need: usize, got: usize, offset: usize, context: impl Into<String>) -> Self {
        Self::Truncated {
            need,
            got,
            offset,
            context: context.into(),
        }
    }

    pub fn unexpected_tag(
        expected: impl Into<String>,
        actual: u8,
        offset: usize,
        context: impl Into<String>,
    ) -> Self {
        Self::UnexpectedTag {
            expected: expected.into(),
            actual,
            offset,
            context: context.into(),
        }
    }

    pub fn checksum_mismatch(
        scope: impl Into<String>,
        expected: u8,
        calculated: u8,
        offset: usize,
    ) -> Self {
        Self::ChecksumMismatch {
            scope: scope.into(),
            expected,
            calculated,
            offset,
        }
    }

    pub fn invalid_variant_type(
        type_code: u8,
        position: impl Into<String>,
        cell: impl Into<String>,
    ) -> Self {
        Self::InvalidVariantType {
            type_code,
            position: position.into(),
            cell: cell.into(),
        }
    }

    pub fn invalid_cell(cell: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        Self::InvalidCell {
            cell: cell.into(),
            offset,
            reason: reason.into(),
        }
    }

    pub fn decode(message_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            message_name: message_name.into(),
            reason: reason.into(),
        }
    }

    /// True for failures caused by malformed incoming bytes
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::InvalidHeader { .. }
                | Self::UnexpectedTag { .. }
                | Self::ChecksumMismatch { .. }
                | Self::InvalidVariantType { .. }
                | Self::InvalidCell { .. }
                | Self::Decode { .. }
        )
    }

    /// True for failures caused by the schema set itself (missing file, unknown message)
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::SchemaLoad { .. } | Self::UnknownMessage { .. })
    }
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
