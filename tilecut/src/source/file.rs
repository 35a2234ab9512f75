//! A single raw tile file.
//!
//! The file carries no coordinates, so it answers every lookup with its content and cannot be
//! enumerated.

use super::TileSource;
use anyhow::{Context, Result, bail};
use std::{fmt::Debug, fs, path::Path};
use tilecut_core::{Blob, TileCoord};

pub struct FileSource {
	name: String,
	blob: Blob,
}

impl FileSource {
	pub fn open_path(path: &Path) -> Result<FileSource> {
		let data = fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
		Ok(FileSource {
			name: path.to_string_lossy().to_string(),
			blob: Blob::from(data),
		})
	}
}

impl TileSource for FileSource {
	fn name(&self) -> &str {
		&self.name
	}

	fn get_tile(&self, _coord: &TileCoord) -> Result<Option<Blob>> {
		Ok(Some(self.blob.clone()))
	}

	fn metadata(&self) -> Result<Vec<(String, String)>> {
		Ok(Vec::new())
	}

	fn tiles(&self, _min_level: u8, _max_level: u8) -> Result<Vec<(TileCoord, Blob)>> {
		bail!("Must specify zoom/x/y to decode a single tile file ({})", self.name)
	}
}

impl Debug for FileSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FileSource")
			.field("name", &self.name)
			.field("bytes", &self.blob.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn answers_every_coordinate() -> Result<()> {
		let dir = tempdir()?;
		let path = dir.path().join("tile.mvt");
		fs::write(&path, b"\x1a\x00")?;

		let source = FileSource::open_path(&path)?;
		assert_eq!(source.get_tile(&TileCoord::new(5, 1, 2)?)?, Some(Blob::from(&b"\x1a\x00"[..])));
		assert_eq!(source.get_tile(&TileCoord::new(0, 0, 0)?)?, Some(Blob::from(&b"\x1a\x00"[..])));
		assert!(source.metadata()?.is_empty());
		assert!(
			source
				.tiles(0, 14)
				.unwrap_err()
				.to_string()
				.starts_with("Must specify zoom/x/y")
		);
		Ok(())
	}
}
