//! Tile sources: mbtiles files, `z/x/y` tile directories and single raw tile files.
//!
//! [`open_source`] picks the right reader for a path. All readers hand out raw tile data, which may
//! still be gzip-compressed.

mod directory;
mod file;
mod mbtiles;

pub use directory::DirectorySource;
pub use file::FileSource;
pub use mbtiles::MBTilesSource;

use anyhow::{Context, Result, ensure};
use std::{fmt::Debug, fs::File, io::Read, path::Path};
use tilecut_core::{Blob, TileCoord};

const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Read access to a set of tiles.
pub trait TileSource: Debug {
	/// Name used in log messages, usually the path.
	fn name(&self) -> &str;

	/// Raw data of one tile, or `None` if the source has no such tile.
	fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>>;

	/// Metadata as name/value pairs, ordered by name.
	fn metadata(&self) -> Result<Vec<(String, String)>>;

	/// All tiles with `min_level <= level <= max_level`, ordered by level, column and row.
	fn tiles(&self, min_level: u8, max_level: u8) -> Result<Vec<(TileCoord, Blob)>>;
}

pub type TileSourceBox = Box<dyn TileSource>;

/// Opens `path` as a tile directory, an mbtiles file or a single tile file.
///
/// Files are recognized as mbtiles by the SQLite header, everything else is treated as one raw tile.
pub fn open_source(path: &Path) -> Result<TileSourceBox> {
	ensure!(path.exists(), "path {path:?} does not exist");

	if path.is_dir() {
		return Ok(Box::new(DirectorySource::open_path(path)?));
	}

	let mut header = Vec::with_capacity(SQLITE_MAGIC.len());
	File::open(path)
		.with_context(|| format!("Failed to open {path:?}"))?
		.take(SQLITE_MAGIC.len() as u64)
		.read_to_end(&mut header)
		.with_context(|| format!("Failed to read the header of {path:?}"))?;

	if header.as_slice() == SQLITE_MAGIC {
		log::debug!("{path:?} is an mbtiles file");
		Ok(Box::new(MBTilesSource::open_path(path)?))
	} else {
		log::debug!("{path:?} is a single tile");
		Ok(Box::new(FileSource::open_path(path)?))
	}
}

/// Looks up `coord` and, if it is missing, its parent tiles up to level 0.
///
/// Returns the coordinate of the tile that was actually found together with its data.
pub fn get_tile_with_fallback(source: &dyn TileSource, coord: TileCoord) -> Result<Option<(TileCoord, Blob)>> {
	let mut current = Some(coord);
	while let Some(candidate) = current {
		if let Some(blob) = source.get_tile(&candidate)? {
			if candidate != coord {
				log::warn!("{}: using tile {candidate} instead of {coord}", source.name());
			}
			return Ok(Some((candidate, blob)));
		}
		current = candidate.parent();
	}
	Ok(None)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::fs;
	use tempfile::tempdir;

	#[test]
	fn open_source_detects_the_kind() -> Result<()> {
		let dir = tempdir()?;

		fs::create_dir_all(dir.path().join("tiles/1/0"))?;
		fs::write(dir.path().join("tiles/1/0/1.pbf"), b"tile")?;
		let source = open_source(&dir.path().join("tiles"))?;
		assert!(format!("{source:?}").starts_with("DirectorySource"));

		let mbtiles = dir.path().join("test.mbtiles");
		mbtiles::tests::create_mbtiles(&mbtiles, &[((0, 0, 0), b"root".as_slice())], &[])?;
		let source = open_source(&mbtiles)?;
		assert!(format!("{source:?}").starts_with("MBTilesSource"));

		let single = dir.path().join("tile.pbf");
		fs::write(&single, b"SQLite")?;
		let source = open_source(&single)?;
		assert!(format!("{source:?}").starts_with("FileSource"));

		assert!(open_source(&dir.path().join("missing")).is_err());
		Ok(())
	}

	#[test]
	fn fallback_walks_up_to_the_parent() -> Result<()> {
		let dir = tempdir()?;
		fs::create_dir_all(dir.path().join("2/1"))?;
		fs::write(dir.path().join("2/1/2.pbf"), b"parent")?;
		let source = DirectorySource::open_path(dir.path())?;

		let requested = TileCoord::new(4, 6, 9)?;
		let (found, blob) = get_tile_with_fallback(&source, requested)?.unwrap();
		assert_eq!(found, TileCoord::new(2, 1, 2)?);
		assert_eq!(blob, Blob::from("parent"));

		let exact = TileCoord::new(2, 1, 2)?;
		assert_eq!(get_tile_with_fallback(&source, exact)?.map(|(c, _)| c), Some(exact));

		assert!(get_tile_with_fallback(&source, TileCoord::new(3, 0, 0)?)?.is_none());
		Ok(())
	}
}
