// The `ValueWriter` trait is the write-side counterpart of `ValueReader`: protobuf varints,
// zigzag varints, fixed-width floats, field keys and length-delimited payloads.

use super::ValueWriterBlob;
use crate::Blob;
use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Writes protobuf-encoded values to an underlying sink.
pub trait ValueWriter {
	fn get_writer(&mut self) -> &mut dyn Write;

	fn write_varint(&mut self, mut value: u64) -> Result<()> {
		while value >= 0x80 {
			self.get_writer().write_all(&[((value & 0x7F) as u8) | 0x80])?;
			value >>= 7;
		}
		self.get_writer().write_all(&[value as u8])?;
		Ok(())
	}

	/// Writes a zigzag-encoded signed varint.
	fn write_svarint(&mut self, value: i64) -> Result<()> {
		self.write_varint(((value << 1) ^ (value >> 63)) as u64)
	}

	fn write_f32(&mut self, value: f32) -> Result<()> {
		Ok(self.get_writer().write_f32::<LittleEndian>(value)?)
	}

	fn write_f64(&mut self, value: f64) -> Result<()> {
		Ok(self.get_writer().write_f64::<LittleEndian>(value)?)
	}

	fn write_blob(&mut self, blob: &Blob) -> Result<()> {
		self.get_writer().write_all(blob.as_slice())?;
		Ok(())
	}

	fn write_string(&mut self, text: &str) -> Result<()> {
		self.get_writer().write_all(text.as_bytes())?;
		Ok(())
	}

	fn write_pbf_key(&mut self, field_number: u32, wire_type: u8) -> Result<()> {
		self
			.write_varint((u64::from(field_number) << 3) | u64::from(wire_type))
			.context("Failed to write PBF key")
	}

	/// Writes a packed repeated `uint32` field (without the field key).
	fn write_pbf_packed_uint32(&mut self, data: &[u32]) -> Result<()> {
		let mut writer = ValueWriterBlob::new();
		for &value in data {
			writer
				.write_varint(u64::from(value))
				.context("Failed to write varint for packed uint32")?;
		}
		self
			.write_pbf_blob(&writer.into_blob())
			.context("Failed to write packed uint32 blob")
	}

	/// Writes a length-prefixed blob.
	fn write_pbf_blob(&mut self, blob: &Blob) -> Result<()> {
		self
			.write_varint(blob.len())
			.context("Failed to write varint for blob length")?;
		self.write_blob(blob).context("Failed to write PBF blob")
	}

	/// Writes a length-prefixed UTF-8 string.
	fn write_pbf_string(&mut self, text: &str) -> Result<()> {
		self
			.write_varint(text.len() as u64)
			.context("Failed to write varint for string length")?;
		self.write_string(text).context("Failed to write PBF string")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn written(f: impl FnOnce(&mut ValueWriterBlob) -> Result<()>) -> Result<Vec<u8>> {
		let mut writer = ValueWriterBlob::new();
		f(&mut writer)?;
		Ok(writer.into_blob().into_vec())
	}

	#[test]
	fn test_write_varint() -> Result<()> {
		assert_eq!(written(|w| w.write_varint(300))?, vec![0b1010_1100, 0b0000_0010]);
		assert_eq!(written(|w| w.write_varint(0))?, vec![0]);
		Ok(())
	}

	#[test]
	fn test_write_svarint() -> Result<()> {
		assert_eq!(written(|w| w.write_svarint(-75))?, vec![149, 1]);
		assert_eq!(written(|w| w.write_svarint(75))?, vec![150, 1]);
		Ok(())
	}

	#[test]
	fn test_write_pbf_key() -> Result<()> {
		assert_eq!(written(|w| w.write_pbf_key(15, 0))?, vec![0x78]);
		Ok(())
	}

	#[test]
	fn test_write_pbf_packed_uint32() -> Result<()> {
		assert_eq!(
			written(|w| w.write_pbf_packed_uint32(&[100, 150, 300]))?,
			vec![0x05, 0x64, 0x96, 0x01, 0xAC, 0x02]
		);
		Ok(())
	}

	#[test]
	fn test_write_pbf_string() -> Result<()> {
		assert_eq!(written(|w| w.write_pbf_string("hi"))?, vec![0x02, b'h', b'i']);
		Ok(())
	}
}
