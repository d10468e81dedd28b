//! # PlainBuffer - Compact Self-Describing Row Format
//!
//! ## Purpose
//!
//! Binary row format used by Tablestore both for the `primary_key` field of
//! requests and for the `row` field of responses. A buffer holds a 4-byte
//! header followed by one or more rows; every row is a tagged sequence of
//! primary key cells, optional attribute cells, an optional delete marker and
//! a CRC-8 row checksum. Every cell carries its own CRC-8 checksum.
//!
//! ## Layout
//!
//! ```text
//! buffer    = header(u32 LE = 0x75) row+
//! row       = TAG_ROW_PK cell* [TAG_ROW_DATA cell*] [TAG_DELETE_ROW_MARKER]
//!             TAG_ROW_CHECKSUM u8
//! cell      = TAG_CELL TAG_CELL_NAME u32 name
//!             [TAG_CELL_VALUE u32 value] [TAG_CELL_TYPE u8]
//!             [TAG_CELL_TIMESTAMP i64] TAG_CELL_CHECKSUM u8
//! value     = type(u8) payload      ; length prefix counts the type byte
//! ```
//!
//! Payloads: `i64` for INTEGER, `f64` bits for DOUBLE, one byte for BOOLEAN,
//! `u32` length + bytes for STRING and BLOB, nothing for NULL and the
//! INF_MIN / INF_MAX / AUTO_INCREMENT sentinels. All integers little-endian.
//!
//! ## Checksums
//!
//! CRC-8 (polynomial 0x07, init 0). The cell checksum covers the name bytes,
//! the value (type byte then payload, with STRING/BLOB length included), the
//! timestamp and finally the cell operation type. The row checksum covers the
//! cell checksums in order followed by one delete-marker byte (1 or 0).

mod checksum;
mod reader;
mod writer;

pub use checksum::{cell_checksum, row_checksum};
pub use reader::PlainBufferReader;
pub use writer::PlainBufferWriter;

use tablestore_types::VariantType;

/// Magic header opening every PlainBuffer
pub const HEADER: u32 = 0x75;

pub const TAG_ROW_PK: u8 = 0x1;
pub const TAG_ROW_DATA: u8 = 0x2;
pub const TAG_CELL: u8 = 0x3;
pub const TAG_CELL_NAME: u8 = 0x4;
pub const TAG_CELL_VALUE: u8 = 0x5;
pub const TAG_CELL_TYPE: u8 = 0x6;
pub const TAG_CELL_TIMESTAMP: u8 = 0x7;
pub const TAG_DELETE_ROW_MARKER: u8 = 0x8;
pub const TAG_ROW_CHECKSUM: u8 = 0x9;
pub const TAG_CELL_CHECKSUM: u8 = 0xA;

/// Any value a PlainBuffer cell can carry, regardless of position
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Blob(Vec<u8>),
    Null,
    InfMin,
    InfMax,
    AutoIncrement,
}

impl CellValue {
    pub fn variant_type(&self) -> VariantType {
        match self {
            Self::Integer(_) => VariantType::Integer,
            Self::Double(_) => VariantType::Double,
            Self::Boolean(_) => VariantType::Boolean,
            Self::String(_) => VariantType::String,
            Self::Blob(_) => VariantType::Blob,
            Self::Null => VariantType::Null,
            Self::InfMin => VariantType::InfMin,
            Self::InfMax => VariantType::InfMax,
            Self::AutoIncrement => VariantType::AutoIncrement,
        }
    }

    /// Size of the value section: type byte plus payload
    pub fn encoded_len(&self) -> usize {
        1 + match self {
            Self::Integer(_) | Self::Double(_) => 8,
            Self::Boolean(_) => 1,
            Self::String(s) => 4 + s.len(),
            Self::Blob(b) => 4 + b.len(),
            Self::Null | Self::InfMin | Self::InfMax | Self::AutoIncrement => 0,
        }
    }
}

/// One decoded or to-be-encoded cell
#[derive(Debug, Clone, PartialEq)]
pub struct PlainBufferCell {
    pub name: String,
    pub value: Option<CellValue>,
    /// Cell operation type (delete one version, delete all versions, ...)
    pub op_type: Option<u8>,
    pub timestamp: Option<i64>,
}

impl PlainBufferCell {
    pub fn new(name: impl Into<String>, value: CellValue) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            op_type: None,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Option<i64>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// One row of a PlainBuffer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlainBufferRow {
    pub primary_key: Vec<PlainBufferCell>,
    pub attributes: Vec<PlainBufferCell>,
    pub delete_marker: bool,
}
