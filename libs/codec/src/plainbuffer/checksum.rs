//! CRC-8 checksums for PlainBuffer cells and rows

use super::{CellValue, PlainBufferCell};
use crc::{Crc, Digest, CRC_8_SMBUS};

/// CRC-8 with polynomial 0x07, zero init, no reflection
const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Checksum of one cell: name, value, timestamp, then operation type
pub fn cell_checksum(cell: &PlainBufferCell) -> u8 {
    let mut digest = CRC8.digest();
    digest.update(cell.name.as_bytes());
    if let Some(value) = &cell.value {
        update_value(&mut digest, value);
    }
    if let Some(ts) = cell.timestamp {
        digest.update(&ts.to_le_bytes());
    }
    if let Some(op) = cell.op_type {
        digest.update(&[op]);
    }
    digest.finalize()
}

/// Checksum of one row from its cells' checksums, in encoding order
pub fn row_checksum(cell_checksums: impl IntoIterator<Item = u8>, delete_marker: bool) -> u8 {
    let mut digest = CRC8.digest();
    for crc in cell_checksums {
        digest.update(&[crc]);
    }
    digest.update(&[u8::from(delete_marker)]);
    digest.finalize()
}

fn update_value(digest: &mut Digest<'_, u8>, value: &CellValue) {
    digest.update(&[u8::from(value.variant_type())]);
    match value {
        CellValue::Integer(v) => digest.update(&v.to_le_bytes()),
        CellValue::Double(v) => digest.update(&v.to_bits().to_le_bytes()),
        CellValue::Boolean(v) => digest.update(&[u8::from(*v)]),
        CellValue::String(s) => {
            digest.update(&(s.len() as u32).to_le_bytes());
            digest.update(s.as_bytes());
        }
        CellValue::Blob(b) => {
            digest.update(&(b.len() as u32).to_le_bytes());
            digest.update(b);
        }
        CellValue::Null | CellValue::InfMin | CellValue::InfMax | CellValue::AutoIncrement => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_check_value() {
        // Catalogue check value for CRC-8/SMBUS over "123456789"
        assert_eq!(CRC8.checksum(b"123456789"), 0xF4);
    }

    #[test]
    fn test_cell_checksum_covers_timestamp() {
        let cell = PlainBufferCell::new("name", CellValue::String("Acme".into()));
        let versioned = cell.clone().with_timestamp(Some(1_700_000_000_000));
        assert_ne!(cell_checksum(&cell), cell_checksum(&versioned));
    }

    #[test]
    fn test_row_checksum_covers_delete_marker() {
        assert_ne!(row_checksum([0x12, 0x34], false), row_checksum([0x12, 0x34], true));
    }
}
