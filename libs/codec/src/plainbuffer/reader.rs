//! PlainBuffer decoder
//!
//! Bounds-checked cursor over a borrowed buffer. Every string and blob is
//! copied out, so decoded rows never borrow from the (possibly reused)
//! transport buffer.

use super::checksum::{cell_checksum, row_checksum};
use super::*;
use crate::error::{CodecError, CodecResult};
use tablestore_types::VariantType;

/// Cursor decoding rows from a PlainBuffer
pub struct PlainBufferReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> PlainBufferReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Decode the header and every row that follows it
    pub fn read_rows(mut self) -> CodecResult<Vec<PlainBufferRow>> {
        self.read_header()?;
        let mut rows = Vec::new();
        while !self.is_at_end() {
            rows.push(self.read_row()?);
        }
        Ok(rows)
    }

    fn read_header(&mut self) -> CodecResult<()> {
        let header = self.read_u32("PlainBuffer header")?;
        if header != HEADER {
            return Err(CodecError::InvalidHeader {
                expected: HEADER,
                actual: header,
            });
        }
        Ok(())
    }

    fn read_row(&mut self) -> CodecResult<PlainBufferRow> {
        self.expect_tag(TAG_ROW_PK, "TAG_ROW_PK", "row")?;

        let mut checksums = Vec::new();
        let primary_key = self.read_cells(&mut checksums)?;

        let attributes = if self.peek_tag() == Some(TAG_ROW_DATA) {
            self.offset += 1;
            self.read_cells(&mut checksums)?
        } else {
            Vec::new()
        };

        let delete_marker = if self.peek_tag() == Some(TAG_DELETE_ROW_MARKER) {
            self.offset += 1;
            true
        } else {
            false
        };

        self.expect_tag(TAG_ROW_CHECKSUM, "TAG_ROW_CHECKSUM", "row")?;
        let checksum_offset = self.offset;
        let expected = self.read_u8("row checksum")?;
        let calculated = row_checksum(checksums, delete_marker);
        if expected != calculated {
            return Err(CodecError::checksum_mismatch(
                "row",
                expected,
                calculated,
                checksum_offset,
            ));
        }

        Ok(PlainBufferRow {
            primary_key,
            attributes,
            delete_marker,
        })
    }

    fn read_cells(&mut self, checksums: &mut Vec<u8>) -> CodecResult<Vec<PlainBufferCell>> {
        let mut cells = Vec::new();
        while self.peek_tag() == Some(TAG_CELL) {
            let (cell, crc) = self.read_cell()?;
            cells.push(cell);
            checksums.push(crc);
        }
        Ok(cells)
    }

    fn read_cell(&mut self) -> CodecResult<(PlainBufferCell, u8)> {
        self.expect_tag(TAG_CELL, "TAG_CELL", "cell")?;
        self.expect_tag(TAG_CELL_NAME, "TAG_CELL_NAME", "cell")?;

        let name_len = self.read_u32("cell name length")? as usize;
        let name_offset = self.offset;
        let name_bytes = self.take(name_len, "cell name")?;
        let name = String::from_utf8(name_bytes.to_vec()).map_err(|e| {
            CodecError::invalid_cell("<non-utf8>", name_offset, format!("cell name: {e}"))
        })?;

        let value = if self.peek_tag() == Some(TAG_CELL_VALUE) {
            self.offset += 1;
            Some(self.read_value(&name)?)
        } else {
            None
        };

        let op_type = if self.peek_tag() == Some(TAG_CELL_TYPE) {
            self.offset += 1;
            Some(self.read_u8("cell type")?)
        } else {
            None
        };

        let timestamp = if self.peek_tag() == Some(TAG_CELL_TIMESTAMP) {
            self.offset += 1;
            Some(self.read_i64("cell timestamp")?)
        } else {
            None
        };

        let cell = PlainBufferCell {
            name,
            value,
            op_type,
            timestamp,
        };

        self.expect_tag(TAG_CELL_CHECKSUM, "TAG_CELL_CHECKSUM", "cell")?;
        let checksum_offset = self.offset;
        let expected = self.read_u8("cell checksum")?;
        let calculated = cell_checksum(&cell);
        if expected != calculated {
            return Err(CodecError::checksum_mismatch(
                format!("cell '{}'", cell.name),
                expected,
                calculated,
                checksum_offset,
            ));
        }

        Ok((cell, calculated))
    }

    fn read_value(&mut self, cell: &str) -> CodecResult<CellValue> {
        let declared_len = self.read_u32("cell value length")? as usize;
        let start = self.offset;
        let type_code = self.read_u8("cell value type")?;
        let variant = VariantType::try_from(type_code)
            .map_err(|_| CodecError::invalid_variant_type(type_code, "any", cell))?;

        let value = match variant {
            VariantType::Integer => CellValue::Integer(self.read_i64("INTEGER value")?),
            VariantType::Double => {
                CellValue::Double(f64::from_bits(self.read_i64("DOUBLE value")? as u64))
            }
            VariantType::Boolean => CellValue::Boolean(self.read_u8("BOOLEAN value")? != 0),
            VariantType::String => {
                let len = self.read_u32("STRING length")? as usize;
                let bytes_offset = self.offset;
                let bytes = self.take(len, "STRING value")?;
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|e| CodecError::invalid_cell(cell, bytes_offset, e.to_string()))?;
                CellValue::String(s)
            }
            VariantType::Blob => {
                let len = self.read_u32("BLOB length")? as usize;
                CellValue::Blob(self.take(len, "BLOB value")?.to_vec())
            }
            VariantType::Null => CellValue::Null,
            VariantType::InfMin => CellValue::InfMin,
            VariantType::InfMax => CellValue::InfMax,
            VariantType::AutoIncrement => CellValue::AutoIncrement,
        };

        let consumed = self.offset - start;
        if consumed != declared_len {
            return Err(CodecError::invalid_cell(
                cell,
                start,
                format!("value length prefix says {declared_len} bytes, {variant} value used {consumed}"),
            ));
        }

        Ok(value)
    }

    fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    fn expect_tag(&mut self, tag: u8, tag_name: &str, context: &str) -> CodecResult<()> {
        let offset = self.offset;
        let actual = self.read_u8(context)?;
        if actual != tag {
            return Err(CodecError::unexpected_tag(tag_name, actual, offset, context));
        }
        Ok(())
    }

    fn take(&mut self, len: usize, context: &str) -> CodecResult<&'a [u8]> {
        let remaining = self.data.len() - self.offset;
        if len > remaining {
            return Err(CodecError::truncated(len, remaining, self.offset, context));
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_u8(&mut self, context: &str) -> CodecResult<u8> {
        Ok(self.take(1, context)?[0])
    }

    fn read_u32(&mut self, context: &str) -> CodecResult<u32> {
        let bytes = self.take(4, context)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&mut self, context: &str) -> CodecResult<i64> {
        let bytes = self.take(8, context)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plainbuffer::PlainBufferWriter;

    fn sample_row() -> PlainBufferRow {
        PlainBufferRow {
            primary_key: vec![
                PlainBufferCell::new("org_id", CellValue::String("5e2c3790".into())),
                PlainBufferCell::new("shard", CellValue::Integer(-3)),
            ],
            attributes: vec![
                PlainBufferCell::new("name", CellValue::String("Acme".into()))
                    .with_timestamp(Some(1_700_000_000_000)),
                PlainBufferCell::new("score", CellValue::Double(0.25)).with_timestamp(Some(1)),
                PlainBufferCell::new("active", CellValue::Boolean(true)).with_timestamp(Some(2)),
                PlainBufferCell::new("logo", CellValue::Blob(vec![0, 1, 255]))
                    .with_timestamp(Some(3)),
            ],
            delete_marker: false,
        }
    }

    fn encode(rows: &[PlainBufferRow]) -> Vec<u8> {
        let mut writer = PlainBufferWriter::new();
        for row in rows {
            writer.write_row(row);
        }
        writer.finish()
    }

    #[test]
    fn test_decodes_what_writer_produces() {
        let row = sample_row();
        let rows = PlainBufferReader::new(&encode(&[row.clone()])).read_rows().unwrap();
        assert_eq!(rows, vec![row]);
    }

    #[test]
    fn test_decodes_multiple_rows_and_delete_marker() {
        let mut deleted = sample_row();
        deleted.attributes.clear();
        deleted.delete_marker = true;

        let rows = PlainBufferReader::new(&encode(&[sample_row(), deleted.clone()]))
            .read_rows()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], deleted);
    }

    #[test]
    fn test_header_only_buffer_has_no_rows() {
        let rows = PlainBufferReader::new(&HEADER.to_le_bytes()).read_rows().unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rejects_bad_header() {
        let mut bytes = encode(&[sample_row()]);
        bytes[0] = 0x76;
        assert!(matches!(
            PlainBufferReader::new(&bytes).read_rows(),
            Err(CodecError::InvalidHeader { actual: 0x76, .. })
        ));
    }

    #[test]
    fn test_detects_corrupted_cell() {
        let mut bytes = encode(&[sample_row()]);
        // Flip one character of the first key value ("5e2c3790")
        let pos = bytes.windows(8).position(|w| w == b"5e2c3790").unwrap();
        bytes[pos] = b'6';
        let err = PlainBufferReader::new(&bytes).read_rows().unwrap_err();
        assert!(matches!(err, CodecError::ChecksumMismatch { ref scope, .. } if scope == "cell 'org_id'"));
    }

    #[test]
    fn test_detects_corrupted_row_checksum() {
        let mut bytes = encode(&[sample_row()]);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let err = PlainBufferReader::new(&bytes).read_rows().unwrap_err();
        assert!(matches!(err, CodecError::ChecksumMismatch { ref scope, .. } if scope == "row"));
    }

    #[test]
    fn test_truncated_buffer() {
        let bytes = encode(&[sample_row()]);
        let err = PlainBufferReader::new(&bytes[..bytes.len() - 5])
            .read_rows()
            .unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_unknown_variant_type() {
        let mut bytes = encode(&[PlainBufferRow {
            primary_key: vec![PlainBufferCell::new("k", CellValue::Integer(7))],
            ..PlainBufferRow::default()
        }]);
        // header(4) ROW_PK CELL CELL_NAME len(4) "k" CELL_VALUE len(4) -> type byte at 17
        assert_eq!(bytes[17], 0x0);
        bytes[17] = 0x4;
        assert!(matches!(
            PlainBufferReader::new(&bytes).read_rows(),
            Err(CodecError::InvalidVariantType { type_code: 0x4, .. })
        ));
    }
}
