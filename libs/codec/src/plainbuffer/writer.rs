//! PlainBuffer encoder

use super::checksum::{cell_checksum, row_checksum};
use super::*;

/// Builds a PlainBuffer in memory
///
/// The header is written on construction; rows are appended one at a time
/// and [`finish`](Self::finish) hands back the bytes.
pub struct PlainBufferWriter {
    buf: Vec<u8>,
}

impl Default for PlainBufferWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainBufferWriter {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity.max(4));
        buf.extend_from_slice(&HEADER.to_le_bytes());
        Self { buf }
    }

    /// Append one row with its cell and row checksums
    pub fn write_row(&mut self, row: &PlainBufferRow) -> &mut Self {
        let mut checksums = Vec::with_capacity(row.primary_key.len() + row.attributes.len());

        self.buf.push(TAG_ROW_PK);
        for cell in &row.primary_key {
            checksums.push(self.write_cell(cell));
        }

        if !row.attributes.is_empty() {
            self.buf.push(TAG_ROW_DATA);
            for cell in &row.attributes {
                checksums.push(self.write_cell(cell));
            }
        }

        if row.delete_marker {
            self.buf.push(TAG_DELETE_ROW_MARKER);
        }

        self.buf.push(TAG_ROW_CHECKSUM);
        self.buf.push(row_checksum(checksums, row.delete_marker));
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn write_cell(&mut self, cell: &PlainBufferCell) -> u8 {
        self.buf.push(TAG_CELL);

        self.buf.push(TAG_CELL_NAME);
        self.write_u32(cell.name.len() as u32);
        self.buf.extend_from_slice(cell.name.as_bytes());

        if let Some(value) = &cell.value {
            self.buf.push(TAG_CELL_VALUE);
            self.write_u32(value.encoded_len() as u32);
            self.write_value(value);
        }

        if let Some(op) = cell.op_type {
            self.buf.push(TAG_CELL_TYPE);
            self.buf.push(op);
        }

        if let Some(ts) = cell.timestamp {
            self.buf.push(TAG_CELL_TIMESTAMP);
            self.buf.extend_from_slice(&ts.to_le_bytes());
        }

        let crc = cell_checksum(cell);
        self.buf.push(TAG_CELL_CHECKSUM);
        self.buf.push(crc);
        crc
    }

    fn write_value(&mut self, value: &CellValue) {
        self.buf.push(u8::from(value.variant_type()));
        match value {
            CellValue::Integer(v) => self.buf.extend_from_slice(&v.to_le_bytes()),
            CellValue::Double(v) => self.buf.extend_from_slice(&v.to_bits().to_le_bytes()),
            CellValue::Boolean(v) => self.buf.push(u8::from(*v)),
            CellValue::String(s) => {
                self.write_u32(s.len() as u32);
                self.buf.extend_from_slice(s.as_bytes());
            }
            CellValue::Blob(b) => {
                self.write_u32(b.len() as u32);
                self.buf.extend_from_slice(b);
            }
            CellValue::Null | CellValue::InfMin | CellValue::InfMax | CellValue::AutoIncrement => {}
        }
    }

    fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_only_row_layout() {
        let row = PlainBufferRow {
            primary_key: vec![PlainBufferCell::new("pk", CellValue::Integer(1))],
            ..PlainBufferRow::default()
        };
        let mut writer = PlainBufferWriter::new();
        writer.write_row(&row);
        let bytes = writer.finish();

        let mut expected = vec![0x75, 0, 0, 0, TAG_ROW_PK, TAG_CELL, TAG_CELL_NAME, 2, 0, 0, 0];
        expected.extend_from_slice(b"pk");
        expected.extend_from_slice(&[TAG_CELL_VALUE, 9, 0, 0, 0, 0x0]);
        expected.extend_from_slice(&1i64.to_le_bytes());
        expected.push(TAG_CELL_CHECKSUM);
        let cell_crc = cell_checksum(&row.primary_key[0]);
        expected.push(cell_crc);
        expected.push(TAG_ROW_CHECKSUM);
        expected.push(row_checksum([cell_crc], false));

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_string_value_length_counts_type_byte() {
        let row = PlainBufferRow {
            primary_key: vec![PlainBufferCell::new("id", CellValue::String("abc".into()))],
            ..PlainBufferRow::default()
        };
        let mut writer = PlainBufferWriter::new();
        writer.write_row(&row);
        let bytes = writer.finish();

        // header(4) + ROW_PK + CELL + CELL_NAME + len(4) + "id" = 13
        assert_eq!(bytes[13], TAG_CELL_VALUE);
        assert_eq!(&bytes[14..18], &8u32.to_le_bytes()); // 1 type + 4 len + 3 bytes
        assert_eq!(bytes[18], 0x3);
        assert_eq!(&bytes[19..23], &3u32.to_le_bytes());
        assert_eq!(&bytes[23..26], b"abc");
    }
}
