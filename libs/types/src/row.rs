//! Rows, primary key cells and attribute cells

use crate::value::{ColumnValue, PrimaryKeyValue, VariantType};
use serde::{Deserialize, Serialize};

/// One cell of a primary key
///
/// Order within the enclosing key is significant and must follow the table's
/// declared key schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimaryKeyItem {
    pub name: String,
    #[serde(flatten)]
    pub value: PrimaryKeyValue,
}

impl PrimaryKeyItem {
    pub fn new(name: impl Into<String>, value: impl Into<PrimaryKeyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn inf_min(name: impl Into<String>) -> Self {
        Self::new(name, PrimaryKeyValue::InfMin)
    }

    pub fn inf_max(name: impl Into<String>) -> Self {
        Self::new(name, PrimaryKeyValue::InfMax)
    }

    pub fn auto_increment(name: impl Into<String>) -> Self {
        Self::new(name, PrimaryKeyValue::AutoIncrement)
    }

    pub fn variant_type(&self) -> VariantType {
        self.value.variant_type()
    }
}

/// One attribute (non-key) cell, optionally versioned by timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub value: ColumnValue,
    /// Version timestamp in milliseconds
    #[serde(rename = "ts", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn variant_type(&self) -> VariantType {
        self.value.variant_type()
    }
}

/// A row: its primary key plus the attribute cells that were returned
///
/// Several attributes may share a name when more than one version was
/// requested; the service returns them newest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub primary_key: Vec<PrimaryKeyItem>,
    pub attributes: Vec<Attribute>,
}

impl Row {
    pub fn new(primary_key: Vec<PrimaryKeyItem>, attributes: Vec<Attribute>) -> Self {
        Self {
            primary_key,
            attributes,
        }
    }

    /// Row carrying only a primary key
    pub fn key_only(primary_key: Vec<PrimaryKeyItem>) -> Self {
        Self::new(primary_key, Vec::new())
    }

    /// First (newest) version of the named attribute
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// All versions of the named attribute, in the order the server sent them
    pub fn versions<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Attribute> + 'a {
        self.attributes.iter().filter(move |a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup_prefers_first_version() {
        let row = Row::new(
            vec![PrimaryKeyItem::new("org_id", "5e2c3790")],
            vec![
                Attribute::new("name", "Acme").with_timestamp(2),
                Attribute::new("name", "Acme Ltd").with_timestamp(1),
                Attribute::new("size", 12i64),
            ],
        );

        assert_eq!(row.attribute("name").unwrap().timestamp, Some(2));
        assert_eq!(row.versions("name").count(), 2);
        assert!(row.attribute("missing").is_none());
    }

    #[test]
    fn test_json_shape_matches_service_naming() {
        let attr = Attribute::new("name", "Acme").with_timestamp(1700000000000);
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "name", "type": "STRING", "value": "Acme", "ts": 1700000000000i64})
        );

        let back: Attribute = serde_json::from_value(json).unwrap();
        assert_eq!(back, attr);

        let key = PrimaryKeyItem::auto_increment("id");
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json, serde_json::json!({"name": "id", "type": "AUTO_INCREMENT"}));
    }
}
