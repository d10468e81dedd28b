//! # Message Codec - Schema-Checked Protobuf Envelopes
//!
//! ## Purpose
//!
//! Encodes typed request envelopes and decodes typed response envelopes by
//! message name. Rust types ([`wire`]) give compile-time field checking; the
//! [`SchemaRegistry`] supplies the message layouts from the definition files
//! and validates the encoded bytes against them:
//!
//! - [`MessageCodec::encode`] serializes, then checks the bytes against the
//!   named schema. A mismatch is a `ValidationError` carrying the schema's
//!   diagnostic text; nothing leaves the process.
//! - [`MessageCodec::decode`] checks incoming bytes against the schema, then
//!   deserializes. Any failure is a `CodecError::Decode`.
//!
//! ## Architecture Role
//!
//! ```text
//! GetRowRequest ──encode──► bytes ──► transport
//!                   │
//!            SchemaRegistry (Api namespace, loaded once)
//!                   │
//! GetRowResponse ◄──decode── bytes ◄── transport
//! ```

mod parser;
pub mod registry;
pub mod schema;
pub mod wire;

pub use registry::{SchemaNamespace, SchemaRegistry, SchemaSource};
pub use schema::{FieldKind, FieldLabel, FieldSchema, MessageSchema, SchemaSet, SchemaViolation};

use crate::error::{CodecError, CodecResult};
use std::sync::Arc;
use tablestore_types::ValidationError;
use tracing::debug;

/// Protobuf envelope resolvable by name in the api namespace
pub trait WireMessage: prost::Message + Default {
    /// Fully qualified schema name, e.g. `ots.GetRowRequest`
    const NAME: &'static str;
}

/// Name-addressed encoder/decoder over a shared schema registry
#[derive(Debug, Clone)]
pub struct MessageCodec {
    registry: Arc<SchemaRegistry>,
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new(Arc::new(SchemaRegistry::embedded()))
    }
}

impl MessageCodec {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Serialize and validate against the named schema
    pub fn encode<M: WireMessage>(&self, message: &M) -> CodecResult<Vec<u8>> {
        let schemas = self.registry.namespace(SchemaNamespace::Api)?;
        let bytes = message.encode_to_vec();
        schemas.check(M::NAME, &bytes).map_err(|violation| {
            if schemas.message(M::NAME).is_none() {
                CodecError::unknown_message(M::NAME, SchemaNamespace::Api.to_string())
            } else {
                CodecError::Validation(ValidationError::schema(violation.to_string()))
            }
        })?;
        debug!(message = M::NAME, bytes = bytes.len(), "Encoded envelope");
        Ok(bytes)
    }

    /// Validate against the named schema and deserialize
    pub fn decode<M: WireMessage>(&self, bytes: &[u8]) -> CodecResult<M> {
        let schemas = self.registry.namespace(SchemaNamespace::Api)?;
        if schemas.message(M::NAME).is_none() {
            return Err(CodecError::unknown_message(M::NAME, SchemaNamespace::Api.to_string()));
        }
        schemas
            .check(M::NAME, bytes)
            .map_err(|violation| CodecError::decode(M::NAME, violation.to_string()))?;
        let message = M::decode(bytes).map_err(|e| CodecError::decode(M::NAME, e.to_string()))?;
        debug!(message = M::NAME, bytes = bytes.len(), "Decoded envelope");
        Ok(message)
    }
}
