//! # Message Schemas - Structural Validation by Message Name
//!
//! ## Purpose
//!
//! A [`SchemaSet`] is the parsed content of one `.proto` definition file: the
//! fully qualified message names with their fields (tag, label, declared type).
//! It validates encoded protobuf bytes against a named message without
//! decoding them into Rust types:
//!
//! - every known field uses the wire type its declared type requires
//! - every `required` field is present
//! - embedded messages are validated recursively
//!
//! Unknown tags are skipped, as protobuf readers do. A singular field seen
//! more than once is accepted (protobuf last-wins).

use bytes::Buf;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Nesting limit for embedded message validation
const MAX_DEPTH: usize = 64;

/// Field cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    Required,
    Optional,
    Repeated,
}

/// How a field is laid out on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Varint,
    Fixed64,
    Fixed32,
    /// `string` or `bytes`
    Bytes,
    /// Embedded message, by fully qualified name
    Message(String),
}

impl FieldKind {
    /// Wire kind of a scalar protobuf type, `None` for named types
    pub fn scalar(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "int32" | "int64" | "uint32" | "uint64" | "sint32" | "sint64" | "bool" => Self::Varint,
            "fixed64" | "sfixed64" | "double" => Self::Fixed64,
            "fixed32" | "sfixed32" | "float" => Self::Fixed32,
            "string" | "bytes" => Self::Bytes,
            _ => return None,
        })
    }

    fn expected_wire_type(&self) -> WireType {
        match self {
            Self::Varint => WireType::Varint,
            Self::Fixed64 => WireType::SixtyFourBit,
            Self::Fixed32 => WireType::ThirtyTwoBit,
            Self::Bytes | Self::Message(_) => WireType::LengthDelimited,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub tag: u32,
    pub label: FieldLabel,
    /// Type as written in the definition file
    pub type_name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    fn accepts(&self, wire_type: WireType) -> bool {
        let expected = self.kind.expected_wire_type();
        // Repeated numeric fields may arrive packed
        wire_type == expected
            || (self.label == FieldLabel::Repeated
                && wire_type == WireType::LengthDelimited
                && matches!(self.kind, FieldKind::Varint | FieldKind::Fixed64 | FieldKind::Fixed32))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    /// Fully qualified name, e.g. `ots.GetRowRequest`
    pub name: String,
    pub fields: Vec<FieldSchema>,
}

impl MessageSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_tag(&self, tag: u32) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.label == FieldLabel::Required)
    }
}

/// Reason an encoded message does not match its schema
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}: {reason}")]
pub struct SchemaViolation {
    /// Message (or `message.field`) where the violation was found
    pub message: String,
    pub reason: String,
}

impl SchemaViolation {
    fn new(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            reason: reason.into(),
        }
    }
}

/// Protobuf wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    SixtyFourBit,
    LengthDelimited,
    StartGroup,
    EndGroup,
    ThirtyTwoBit,
}

impl WireType {
    fn from_key(key: u64) -> Option<Self> {
        Some(match key & 0x7 {
            0 => Self::Varint,
            1 => Self::SixtyFourBit,
            2 => Self::LengthDelimited,
            3 => Self::StartGroup,
            4 => Self::EndGroup,
            5 => Self::ThirtyTwoBit,
            _ => return None,
        })
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Varint => "varint",
            Self::SixtyFourBit => "64-bit",
            Self::LengthDelimited => "length-delimited",
            Self::StartGroup => "start-group",
            Self::EndGroup => "end-group",
            Self::ThirtyTwoBit => "32-bit",
        };
        f.write_str(name)
    }
}

/// All messages and enums declared by one definition file
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    pub(crate) package: String,
    pub(crate) messages: HashMap<String, MessageSchema>,
    pub(crate) enums: HashSet<String>,
}

impl SchemaSet {
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn message(&self, name: &str) -> Option<&MessageSchema> {
        self.messages.get(name)
    }

    pub fn contains_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Validate encoded bytes against the named message
    pub fn check(&self, name: &str, bytes: &[u8]) -> Result<(), SchemaViolation> {
        let schema = self
            .message(name)
            .ok_or_else(|| SchemaViolation::new(name, "message type not declared in schema"))?;
        self.check_message(schema, bytes, 0)
    }

    fn check_message(
        &self,
        schema: &MessageSchema,
        mut buf: &[u8],
        depth: usize,
    ) -> Result<(), SchemaViolation> {
        if depth > MAX_DEPTH {
            return Err(SchemaViolation::new(&schema.name, "message nesting too deep"));
        }

        let mut seen = HashSet::new();
        while buf.has_remaining() {
            let key = read_varint(&mut buf)
                .ok_or_else(|| SchemaViolation::new(&schema.name, "truncated field key"))?;
            let tag = (key >> 3) as u32;
            if tag == 0 {
                return Err(SchemaViolation::new(&schema.name, "invalid field tag 0"));
            }
            let wire_type = WireType::from_key(key).ok_or_else(|| {
                SchemaViolation::new(&schema.name, format!("invalid wire type {} for tag {tag}", key & 0x7))
            })?;
            let field = schema.field_by_tag(tag);
            let context = match field {
                Some(f) => format!("{}.{}", schema.name, f.name),
                None => format!("{} (tag {tag})", schema.name),
            };

            let payload = skip_value(&mut buf, wire_type)
                .map_err(|reason| SchemaViolation::new(&context, reason))?;

            let Some(field) = field else { continue };

            if !field.accepts(wire_type) {
                return Err(SchemaViolation::new(
                    &context,
                    format!(
                        "declared as {} (expects {} wire type), got {wire_type}",
                        field.type_name,
                        field.kind.expected_wire_type()
                    ),
                ));
            }

            if let FieldKind::Message(type_name) = &field.kind {
                let nested = self.message(type_name).ok_or_else(|| {
                    SchemaViolation::new(&context, format!("unresolved message type {type_name}"))
                })?;
                self.check_message(nested, payload, depth + 1)?;
            }

            seen.insert(tag);
        }

        if let Some(missing) = schema.required_fields().find(|f| !seen.contains(&f.tag)) {
            return Err(SchemaViolation::new(
                &schema.name,
                format!("missing required field '{}' (tag {})", missing.name, missing.tag),
            ));
        }

        Ok(())
    }
}

/// Advance past one field value, returning the payload of length-delimited values
fn skip_value<'a>(buf: &mut &'a [u8], wire_type: WireType) -> Result<&'a [u8], String> {
    let len = match wire_type {
        WireType::Varint => {
            read_varint(buf).ok_or("truncated varint")?;
            return Ok(&[]);
        }
        WireType::SixtyFourBit => 8,
        WireType::ThirtyTwoBit => 4,
        WireType::LengthDelimited => {
            read_varint(buf).ok_or("truncated length prefix")? as usize
        }
        WireType::StartGroup | WireType::EndGroup => {
            return Err("groups are not supported".to_string());
        }
    };
    if buf.remaining() < len {
        return Err(format!("need {len} bytes, {} remaining", buf.remaining()));
    }
    let (payload, rest) = buf.split_at(len);
    *buf = rest;
    Ok(payload)
}

fn read_varint(buf: &mut &[u8]) -> Option<u64> {
    let mut value = 0u64;
    for shift in (0..64).step_by(7) {
        if !buf.has_remaining() {
            return None;
        }
        let byte = buf.get_u8();
        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> SchemaSet {
        SchemaSet::parse(
            "test.proto",
            r#"
            package t;
            message Inner { required int32 n = 1; }
            message Outer {
                required string name = 1;
                optional Inner inner = 2;
                repeated int64 values = 3;
            }
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_accepts_well_formed_message() {
        // name = "ab", inner { n = 1 }, values = [5, 6] (unpacked)
        let bytes = [0x0A, 2, b'a', b'b', 0x12, 2, 0x08, 1, 0x18, 5, 0x18, 6];
        assert!(schema().check("t.Outer", &bytes).is_ok());
    }

    #[test]
    fn test_accepts_packed_repeated() {
        let bytes = [0x0A, 0, 0x1A, 2, 5, 6];
        assert!(schema().check("t.Outer", &bytes).is_ok());
    }

    #[test]
    fn test_reports_missing_required_field() {
        let err = schema().check("t.Outer", &[0x18, 5]).unwrap_err();
        assert_eq!(err.message, "t.Outer");
        assert!(err.reason.contains("missing required field 'name'"));
    }

    #[test]
    fn test_reports_missing_required_in_nested() {
        let err = schema().check("t.Outer", &[0x0A, 0, 0x12, 0]).unwrap_err();
        assert_eq!(err.message, "t.Inner");
    }

    #[test]
    fn test_reports_wrong_wire_type() {
        // name sent as varint
        let err = schema().check("t.Outer", &[0x08, 1]).unwrap_err();
        assert_eq!(err.message, "t.Outer.name");
        assert!(err.reason.contains("got varint"));
    }

    #[test]
    fn test_skips_unknown_fields() {
        let bytes = [0x0A, 0, 0x78, 1];
        assert!(schema().check("t.Outer", &bytes).is_ok());
    }

    #[test]
    fn test_reports_truncation() {
        let err = schema().check("t.Outer", &[0x0A, 5, b'a']).unwrap_err();
        assert!(err.reason.contains("need 5 bytes"));
    }
}
