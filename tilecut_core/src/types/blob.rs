//! [`Blob`], a thin wrapper around `Vec<u8>` used for raw tile data and encoded protobuf messages.
//!
//! ```rust
//! use tilecut_core::Blob;
//!
//! let blob = Blob::from(&[0x1f, 0x8b, 0x08]);
//! assert_eq!(blob.len(), 3);
//! assert_eq!(blob.as_slice(), &[0x1f, 0x8b, 0x08]);
//! ```

use std::fmt::Debug;

/// Owned byte buffer.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Creates a zero-filled `Blob` of `length` bytes.
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_slice()
	}

	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		self.0.as_mut_slice()
	}

	/// Interprets the bytes as UTF-8, replacing invalid sequences.
	#[must_use]
	pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns `true` if the blob begins with `prefix`.
	#[must_use]
	pub fn starts_with(&self, prefix: &[u8]) -> bool {
		self.0.starts_with(prefix)
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		const MAX: usize = 16;
		let head = self
			.0
			.iter()
			.take(MAX)
			.map(|b| format!("{b:02x}"))
			.collect::<Vec<_>>()
			.join(" ");
		if self.0.len() > MAX {
			write!(f, "Blob({}): {head} …", self.0.len())
		} else {
			write!(f, "Blob({}): {head}", self.0.len())
		}
	}
}
