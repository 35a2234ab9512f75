//! Gzip handling for raw tile data.
//!
//! Tiles in mbtiles files are usually gzip-compressed, tiles in directories may or may not be.
//! [`decompress_if_gzip`] sniffs the gzip magic bytes and inflates when present.

use crate::Blob;
use anyhow::{Context, Result};
use flate2::{
	Compression,
	bufread::{GzDecoder, GzEncoder},
};
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns `true` if the blob starts with the gzip magic bytes.
#[must_use]
pub fn is_gzip(blob: &Blob) -> bool {
	blob.starts_with(&GZIP_MAGIC)
}

pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut encoder = GzEncoder::new(blob.as_slice(), Compression::best());
	let mut compressed_data = Vec::new();
	encoder
		.read_to_end(&mut compressed_data)
		.context("Failed to compress data using Gzip")?;
	Ok(Blob::from(compressed_data))
}

pub fn decompress_gzip(blob: &Blob) -> Result<Blob> {
	let mut decoder = GzDecoder::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	decoder
		.read_to_end(&mut decompressed_data)
		.context("Failed to decompress data using Gzip")?;
	Ok(Blob::from(decompressed_data))
}

/// Inflates `blob` if it is gzip-compressed.
///
/// Returns the raw data and whether it was compressed.
pub fn decompress_if_gzip(blob: Blob) -> Result<(Blob, bool)> {
	if is_gzip(&blob) {
		log::trace!("inflating gzip tile of {} bytes", blob.len());
		Ok((decompress_gzip(&blob)?, true))
	} else {
		Ok((blob, false))
	}
}
