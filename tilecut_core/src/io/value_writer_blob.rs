//! [`ValueWriterBlob`] collects protobuf output in memory and hands it out as a [`Blob`].

use super::ValueWriter;
use crate::Blob;
use std::io::{Cursor, Write};

/// An in-memory [`ValueWriter`].
pub struct ValueWriterBlob {
	cursor: Cursor<Vec<u8>>,
}

impl ValueWriterBlob {
	#[must_use]
	pub fn new() -> ValueWriterBlob {
		ValueWriterBlob {
			cursor: Cursor::new(Vec::new()),
		}
	}

	#[must_use]
	pub fn into_blob(self) -> Blob {
		Blob::from(self.cursor.into_inner())
	}
}

impl ValueWriter for ValueWriterBlob {
	fn get_writer(&mut self) -> &mut dyn Write {
		&mut self.cursor
	}
}

impl Default for ValueWriterBlob {
	fn default() -> Self {
		Self::new()
	}
}
