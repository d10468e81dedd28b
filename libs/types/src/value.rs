//! # Cell Values - Variant-Typed Primary Key and Attribute Values
//!
//! ## Purpose
//!
//! Every cell of a Tablestore row carries a value tagged with a [`VariantType`].
//! The set of legal tags differs by position: primary key cells may hold the
//! `INF_MIN` / `INF_MAX` / `AUTO_INCREMENT` sentinels but never doubles or
//! booleans, attribute cells are the other way around. The two positions are
//! therefore modelled as two separate sum types, [`PrimaryKeyValue`] and
//! [`ColumnValue`], so that every site inspecting a cell matches exhaustively
//! over exactly the variants it can see.
//!
//! ## Wire Codes
//!
//! The numeric tag values are the ones used by the PlainBuffer row format and
//! must remain stable:
//!
//! | Tag | Code |
//! |-----|------|
//! | INTEGER | 0x0 |
//! | DOUBLE | 0x1 |
//! | BOOLEAN | 0x2 |
//! | STRING | 0x3 |
//! | NULL | 0x6 |
//! | BLOB | 0x7 |
//! | INF_MIN | 0x9 |
//! | INF_MAX | 0xa |
//! | AUTO_INCREMENT | 0xb |

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variant type tag of a cell value
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    Integer = 0x0,
    Double = 0x1,
    Boolean = 0x2,
    String = 0x3,
    Null = 0x6,
    Blob = 0x7,
    InfMin = 0x9,
    InfMax = 0xa,
    AutoIncrement = 0xb,
}

impl VariantType {
    /// Check if this tag may appear in a primary key cell
    pub fn is_primary_key_type(&self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::String
                | Self::Blob
                | Self::InfMin
                | Self::InfMax
                | Self::AutoIncrement
        )
    }

    /// Check if this tag may appear in an attribute cell
    pub fn is_attribute_type(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Double | Self::Boolean | Self::String | Self::Blob
        )
    }

    /// Canonical upper-case name, as used by the service and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Double => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Null => "NULL",
            Self::Blob => "BLOB",
            Self::InfMin => "INF_MIN",
            Self::InfMax => "INF_MAX",
            Self::AutoIncrement => "AUTO_INCREMENT",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a primary key cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryKeyValue {
    /// Sorts before every other key value; only meaningful in range bounds
    InfMin,
    /// Sorts after every other key value; only meaningful in range bounds
    InfMax,
    /// Placeholder the server replaces with a generated value on write
    AutoIncrement,
    Integer(i64),
    String(String),
    Blob(Vec<u8>),
}

impl PrimaryKeyValue {
    pub fn variant_type(&self) -> VariantType {
        match self {
            Self::InfMin => VariantType::InfMin,
            Self::InfMax => VariantType::InfMax,
            Self::AutoIncrement => VariantType::AutoIncrement,
            Self::Integer(_) => VariantType::Integer,
            Self::String(_) => VariantType::String,
            Self::Blob(_) => VariantType::Blob,
        }
    }

    /// Check if this is one of the value-less sentinel variants
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::InfMin | Self::InfMax | Self::AutoIncrement)
    }
}

impl From<i64> for PrimaryKeyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for PrimaryKeyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PrimaryKeyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for PrimaryKeyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

/// Value of an attribute (non-key) cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnValue {
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    pub fn variant_type(&self) -> VariantType {
        match self {
            Self::Integer(_) => VariantType::Integer,
            Self::Double(_) => VariantType::Double,
            Self::Boolean(_) => VariantType::Boolean,
            Self::String(_) => VariantType::String,
            Self::Blob(_) => VariantType::Blob,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for ColumnValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}
