//! PlainBuffer Row Codec Property Tests
//!
//! Properties that must hold for any row the client can build:
//! - decoding what was encoded yields the same typed rows
//! - corrupting any byte never panics the decoder
//! - a key-only encoding decodes to exactly one row with no attributes

use proptest::prelude::*;
use tablestore_codec::{decode_rows, encode_primary_key, encode_rows};
use tablestore_types::{Attribute, ColumnValue, PrimaryKeyItem, PrimaryKeyValue, Row};

fn column_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,15}"
}

fn primary_key_value() -> impl Strategy<Value = PrimaryKeyValue> {
    prop_oneof![
        Just(PrimaryKeyValue::InfMin),
        Just(PrimaryKeyValue::InfMax),
        Just(PrimaryKeyValue::AutoIncrement),
        any::<i64>().prop_map(PrimaryKeyValue::Integer),
        ".{0,32}".prop_map(PrimaryKeyValue::String),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(PrimaryKeyValue::Blob),
    ]
}

fn column_value() -> impl Strategy<Value = ColumnValue> {
    prop_oneof![
        any::<i64>().prop_map(ColumnValue::Integer),
        (-1.0e12f64..1.0e12).prop_map(ColumnValue::Double),
        any::<bool>().prop_map(ColumnValue::Boolean),
        ".{0,32}".prop_map(ColumnValue::String),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(ColumnValue::Blob),
    ]
}

fn primary_key() -> impl Strategy<Value = Vec<PrimaryKeyItem>> {
    prop::collection::vec(
        (column_name(), primary_key_value()).prop_map(|(name, value)| PrimaryKeyItem { name, value }),
        1..5,
    )
}

fn row() -> impl Strategy<Value = Row> {
    let attribute = (column_name(), column_value(), prop::option::of(0i64..4_000_000_000_000))
        .prop_map(|(name, value, timestamp)| Attribute {
            name,
            value,
            timestamp,
        });
    (primary_key(), prop::collection::vec(attribute, 0..8))
        .prop_map(|(primary_key, attributes)| Row::new(primary_key, attributes))
}

proptest! {
    #[test]
    fn prop_rows_survive_encoding(rows in prop::collection::vec(row(), 1..4)) {
        let decoded = decode_rows(&encode_rows(&rows)).unwrap();
        prop_assert_eq!(decoded, rows);
    }

    #[test]
    fn prop_key_only_encoding_is_one_bare_row(key in primary_key()) {
        let decoded = decode_rows(&encode_primary_key(&key)).unwrap();
        prop_assert_eq!(decoded.len(), 1);
        prop_assert!(decoded[0].attributes.is_empty());
        prop_assert_eq!(&decoded[0].primary_key, &key);
    }

    #[test]
    fn prop_corruption_never_panics(row in row(), index in any::<prop::sample::Index>(), flip in 1u8..=255) {
        let mut bytes = encode_rows(&[row]);
        let i = index.index(bytes.len());
        bytes[i] ^= flip;
        let _ = decode_rows(&bytes);
    }

    #[test]
    fn prop_truncation_is_an_error(row in row(), cut in any::<prop::sample::Index>()) {
        let bytes = encode_rows(&[row]);
        // Any proper prefix past the header is an incomplete row
        let len = 4 + cut.index(bytes.len() - 4);
        prop_assert!(decode_rows(&bytes[..len]).is_err() || len == 4);
    }
}
