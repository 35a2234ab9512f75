//! Tiles stored in a directory structure.
//!
//! Tile files must follow the naming pattern:
//! ```text
//! <root>/<z>/<x>/<y>.pbf
//! <root>/<z>/<x>/<y>.mvt
//! ```
//! An optional `<root>/metadata.json` holding a flat JSON object provides the metadata listing.
//! Other files and folders are ignored.

use super::TileSource;
use anyhow::{Context, Result, bail, ensure};
use std::{
	collections::BTreeMap,
	fmt::Debug,
	fs,
	path::{Path, PathBuf},
};
use tilecut_core::{Blob, TileCoord, json::JsonValue};

const TILE_EXTENSIONS: [&str; 2] = ["pbf", "mvt"];

pub struct DirectorySource {
	name: String,
	dir: PathBuf,
	tile_map: BTreeMap<(u8, u32, u32), PathBuf>,
}

impl DirectorySource {
	/// Scans `dir` for tile files.
	pub fn open_path(dir: &Path) -> Result<DirectorySource> {
		log::trace!("read {dir:?}");

		ensure!(dir.exists(), "path {dir:?} does not exist");
		ensure!(dir.is_dir(), "path {dir:?} is not a directory");

		let mut tile_map = BTreeMap::new();

		for entry1 in fs::read_dir(dir)? {
			// z level
			let entry1 = entry1?;
			let Some(level) = numeric_name::<u8>(&entry1.path()) else {
				continue;
			};

			for entry2 in fs::read_dir(entry1.path())? {
				// x level
				let entry2 = entry2?;
				let Some(x) = numeric_name::<u32>(&entry2.path()) else {
					continue;
				};

				for entry3 in fs::read_dir(entry2.path())? {
					// y level
					let path = entry3?.path();
					let is_tile = path
						.extension()
						.and_then(|e| e.to_str())
						.is_some_and(|e| TILE_EXTENSIONS.contains(&e));
					if !is_tile {
						continue;
					}
					let Some(y) = path.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse::<u32>().ok()) else {
						continue;
					};
					if TileCoord::new(level, x, y).is_err() {
						log::warn!("ignoring {path:?}: {level}/{x}/{y} is not a valid tile");
						continue;
					}
					tile_map.insert((level, x, y), path);
				}
			}
		}

		log::debug!("found {} tiles in {dir:?}", tile_map.len());

		Ok(DirectorySource {
			name: dir.to_string_lossy().to_string(),
			dir: dir.to_path_buf(),
			tile_map,
		})
	}
}

fn numeric_name<T: std::str::FromStr>(path: &Path) -> Option<T> {
	if !path.is_dir() {
		return None;
	}
	path.file_name()?.to_str()?.parse::<T>().ok()
}

impl TileSource for DirectorySource {
	fn name(&self) -> &str {
		&self.name
	}

	fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		log::trace!("get_tile {coord:?}");

		let Some(path) = self.tile_map.get(&(coord.level, coord.x, coord.y)) else {
			return Ok(None);
		};
		let data = fs::read(path).with_context(|| format!("Failed to read tile {path:?}"))?;
		Ok(Some(Blob::from(data)))
	}

	fn metadata(&self) -> Result<Vec<(String, String)>> {
		let path = self.dir.join("metadata.json");
		if !path.exists() {
			return Ok(Vec::new());
		}

		let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {path:?}"))?;
		let JsonValue::Object(object) =
			JsonValue::parse_str(&text).with_context(|| format!("Failed to parse {path:?}"))?
		else {
			bail!("{path:?} must contain a JSON object");
		};

		Ok(object
			.0
			.into_iter()
			.map(|(name, value)| match value {
				JsonValue::String(value) => (name, value),
				other => (name, other.stringify()),
			})
			.collect())
	}

	fn tiles(&self, min_level: u8, max_level: u8) -> Result<Vec<(TileCoord, Blob)>> {
		let mut tiles = Vec::new();
		for (&(level, x, y), path) in self.tile_map.range((min_level, 0, 0)..=(max_level, u32::MAX, u32::MAX)) {
			let data = fs::read(path).with_context(|| format!("Failed to read tile {path:?}"))?;
			tiles.push((TileCoord::new(level, x, y)?, Blob::from(data)));
		}
		Ok(tiles)
	}
}

impl Debug for DirectorySource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DirectorySource")
			.field("name", &self.name)
			.field("tiles", &self.tile_map.len())
			.finish()
	}
}
