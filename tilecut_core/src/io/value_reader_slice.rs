//! [`ValueReaderSlice`] reads protobuf values from a borrowed byte slice.

use super::ValueReader;
use anyhow::{Result, anyhow, bail};
use std::io::{Cursor, Read};

/// A [`ValueReader`] over a byte slice.
pub struct ValueReaderSlice<'a> {
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a> ValueReaderSlice<'a> {
	#[must_use]
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a> {
		ValueReaderSlice {
			len: slice.len() as u64,
			cursor: Cursor::new(slice),
		}
	}
}

impl<'a> ValueReader<'a> for ValueReaderSlice<'a> {
	fn get_reader(&mut self) -> &mut dyn Read {
		&mut self.cursor
	}

	fn len(&self) -> u64 {
		self.len
	}

	fn position(&mut self) -> u64 {
		self.cursor.position()
	}

	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b> + 'b>> {
		let start = self.cursor.position();
		let end = start + length;
		if end > self.len {
			bail!("Requested sub-reader length ({length}) exceeds remaining data");
		}

		self.cursor.set_position(end);
		let slice: &'a [u8] = *self.cursor.get_ref();
		Ok(Box::new(ValueReaderSlice::new(
			slice
				.get(start as usize..end as usize)
				.ok_or(anyhow!("out of bounds"))?,
		)))
	}
}
