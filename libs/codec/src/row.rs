//! # Row Codec Adapter
//!
//! ## Purpose
//!
//! Bridges the typed data model (`PrimaryKeyItem`, `Attribute`, `Row`) and the
//! PlainBuffer cell representation:
//!
//! - [`encode_primary_key`] produces the key-only buffer sent as a request's
//!   `primary_key` field
//! - [`decode_rows`] turns a response's `row` field back into typed rows,
//!   rejecting cells whose variant type is illegal for their position
//!
//! Decoded strings and blobs are owned copies; nothing borrows from the
//! response buffer.

use crate::error::{CodecError, CodecResult};
use crate::plainbuffer::{CellValue, PlainBufferCell, PlainBufferReader, PlainBufferRow, PlainBufferWriter};
use tablestore_types::{Attribute, ColumnValue, PrimaryKeyItem, PrimaryKeyValue, Row};
use tracing::debug;

/// Encode a primary key as a single key-only PlainBuffer row
pub fn encode_primary_key(primary_key: &[PrimaryKeyItem]) -> Vec<u8> {
    let row = PlainBufferRow {
        primary_key: primary_key.iter().map(key_cell).collect(),
        ..PlainBufferRow::default()
    };
    let mut writer = PlainBufferWriter::new();
    writer.write_row(&row);
    writer.finish()
}

/// Encode complete rows (key plus versioned attributes)
pub fn encode_rows(rows: &[Row]) -> Vec<u8> {
    let mut writer = PlainBufferWriter::new();
    for row in rows {
        writer.write_row(&PlainBufferRow {
            primary_key: row.primary_key.iter().map(key_cell).collect(),
            attributes: row.attributes.iter().map(attribute_cell).collect(),
            delete_marker: false,
        });
    }
    writer.finish()
}

/// Decode a PlainBuffer into typed rows
pub fn decode_rows(bytes: &[u8]) -> CodecResult<Vec<Row>> {
    let rows = PlainBufferReader::new(bytes).read_rows()?;
    debug!(bytes = bytes.len(), rows = rows.len(), "Decoded PlainBuffer rows");
    rows.into_iter().map(into_row).collect()
}

fn key_cell(item: &PrimaryKeyItem) -> PlainBufferCell {
    let value = match &item.value {
        PrimaryKeyValue::InfMin => CellValue::InfMin,
        PrimaryKeyValue::InfMax => CellValue::InfMax,
        PrimaryKeyValue::AutoIncrement => CellValue::AutoIncrement,
        PrimaryKeyValue::Integer(v) => CellValue::Integer(*v),
        PrimaryKeyValue::String(s) => CellValue::String(s.clone()),
        PrimaryKeyValue::Blob(b) => CellValue::Blob(b.clone()),
    };
    PlainBufferCell::new(item.name.clone(), value)
}

fn attribute_cell(attr: &Attribute) -> PlainBufferCell {
    let value = match &attr.value {
        ColumnValue::Integer(v) => CellValue::Integer(*v),
        ColumnValue::Double(v) => CellValue::Double(*v),
        ColumnValue::Boolean(v) => CellValue::Boolean(*v),
        ColumnValue::String(s) => CellValue::String(s.clone()),
        ColumnValue::Blob(b) => CellValue::Blob(b.clone()),
    };
    PlainBufferCell::new(attr.name.clone(), value).with_timestamp(attr.timestamp)
}

fn into_row(row: PlainBufferRow) -> CodecResult<Row> {
    if row.delete_marker {
        debug!("Decoded row carries a delete marker");
    }
    let primary_key = row
        .primary_key
        .into_iter()
        .map(into_primary_key_item)
        .collect::<CodecResult<Vec<_>>>()?;
    let attributes = row
        .attributes
        .into_iter()
        .map(into_attribute)
        .collect::<CodecResult<Vec<_>>>()?;
    Ok(Row::new(primary_key, attributes))
}

fn into_primary_key_item(cell: PlainBufferCell) -> CodecResult<PrimaryKeyItem> {
    let value = match cell.value {
        Some(CellValue::InfMin) => PrimaryKeyValue::InfMin,
        Some(CellValue::InfMax) => PrimaryKeyValue::InfMax,
        Some(CellValue::AutoIncrement) => PrimaryKeyValue::AutoIncrement,
        Some(CellValue::Integer(v)) => PrimaryKeyValue::Integer(v),
        Some(CellValue::String(s)) => PrimaryKeyValue::String(s),
        Some(CellValue::Blob(b)) => PrimaryKeyValue::Blob(b),
        Some(other @ (CellValue::Double(_) | CellValue::Boolean(_) | CellValue::Null)) => {
            return Err(CodecError::invalid_variant_type(
                u8::from(other.variant_type()),
                "primary key",
                cell.name,
            ));
        }
        None => {
            return Err(CodecError::invalid_cell(cell.name, 0, "primary key cell has no value"));
        }
    };
    Ok(PrimaryKeyItem {
        name: cell.name,
        value,
    })
}

fn into_attribute(cell: PlainBufferCell) -> CodecResult<Attribute> {
    let value = match cell.value {
        Some(CellValue::Integer(v)) => ColumnValue::Integer(v),
        Some(CellValue::Double(v)) => ColumnValue::Double(v),
        Some(CellValue::Boolean(v)) => ColumnValue::Boolean(v),
        Some(CellValue::String(s)) => ColumnValue::String(s),
        Some(CellValue::Blob(b)) => ColumnValue::Blob(b),
        Some(
            other @ (CellValue::Null
            | CellValue::InfMin
            | CellValue::InfMax
            | CellValue::AutoIncrement),
        ) => {
            return Err(CodecError::invalid_variant_type(
                u8::from(other.variant_type()),
                "attribute",
                cell.name,
            ));
        }
        None => {
            return Err(CodecError::invalid_cell(cell.name, 0, "attribute cell has no value"));
        }
    };
    Ok(Attribute {
        name: cell.name,
        value,
        timestamp: cell.timestamp,
    })
}
