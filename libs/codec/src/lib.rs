//! # Tablestore Codec
//!
//! ## Purpose
//!
//! Binary formats spoken by the Tablestore row-read RPC:
//! - **PlainBuffer**: the compact, checksummed row format carried inside
//!   request and response envelopes
//! - **Row adapter**: typed `PrimaryKeyItem`/`Attribute` ↔ PlainBuffer cells
//! - **Message codec**: protobuf envelopes encoded and decoded by message
//!   name, validated against definitions loaded once from a schema registry
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → libs/network → libs/client
//!     ↑           ↓            ↓
//! Pure Data   PlainBuffer   Transport
//! Structures  + Envelopes   + Signing
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Request signing or HTTP transport (belongs in libs/network)
//! - Request defaults and orchestration (belongs in libs/client)

pub mod error;
pub mod message;
pub mod plainbuffer;
pub mod row;

pub use error::{CodecError, CodecResult};
pub use message::{
    wire, MessageCodec, SchemaNamespace, SchemaRegistry, SchemaSource, WireMessage,
};
pub use plainbuffer::{CellValue, PlainBufferCell, PlainBufferReader, PlainBufferRow, PlainBufferWriter};
pub use row::{decode_rows, encode_primary_key, encode_rows};
