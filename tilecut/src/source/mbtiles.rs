//! `SQLite` file `*.mbtiles` as tile source.
//!
//! Rows in the `tiles` table use the TMS scheme, so `tile_row` is flipped (`y' = 2^z - 1 - y`) on the
//! way in and out.

use super::TileSource;
use anyhow::{Context, Result, bail, ensure};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension},
};
use std::{fmt::Debug, path::Path};
use tilecut_core::{Blob, TileCoord};

pub struct MBTilesSource {
	name: String,
	pool: Pool<SqliteConnectionManager>,
}

impl MBTilesSource {
	/// Opens an mbtiles file read-only.
	pub fn open_path(path: &Path) -> Result<MBTilesSource> {
		log::debug!("open {path:?}");
		ensure!(path.exists(), "file {path:?} does not exist");

		let manager = SqliteConnectionManager::file(path).with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY);
		let pool = Pool::builder()
			.max_size(4)
			.build(manager)
			.with_context(|| format!("Failed to open SQLite database {path:?}"))?;

		Ok(MBTilesSource {
			name: path.to_string_lossy().to_string(),
			pool,
		})
	}
}

impl TileSource for MBTilesSource {
	fn name(&self) -> &str {
		&self.name
	}

	fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		log::trace!("read tile {coord:?}");

		let conn = self.pool.get()?;
		let mut stmt = conn
			.prepare("SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3")
			.with_context(|| format!("{}: select failed", self.name))?;

		let data = stmt
			.query_row([u32::from(coord.level), coord.x, coord.flipped_y()], |row| {
				row.get::<_, Vec<u8>>(0)
			})
			.optional()?;

		Ok(data.map(Blob::from))
	}

	fn metadata(&self) -> Result<Vec<(String, String)>> {
		let conn = self.pool.get()?;
		let mut stmt = conn
			.prepare("SELECT name, value FROM metadata ORDER BY name")
			.with_context(|| format!("{}: select failed", self.name))?;
		let rows = stmt.query_map([], |row| {
			Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?))
		})?;

		let mut entries = Vec::new();
		for row in rows {
			match row? {
				(Some(name), Some(value)) => entries.push((name, value)),
				_ => bail!("Corrupt mbtiles file: null metadata"),
			}
		}
		Ok(entries)
	}

	fn tiles(&self, min_level: u8, max_level: u8) -> Result<Vec<(TileCoord, Blob)>> {
		let conn = self.pool.get()?;
		let mut stmt = conn
			.prepare(
				"SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles WHERE zoom_level BETWEEN ?1 AND ?2 ORDER BY zoom_level, tile_column, tile_row",
			)
			.with_context(|| format!("{}: select failed", self.name))?;
		let rows = stmt.query_map([min_level, max_level], |row| {
			Ok((
				row.get::<_, i64>(0)?,
				row.get::<_, i64>(1)?,
				row.get::<_, i64>(2)?,
				row.get::<_, Vec<u8>>(3)?,
			))
		})?;

		let mut tiles = Vec::new();
		for row in rows {
			let (level, column, tms_row, data) = row?;
			ensure!((0..32).contains(&level), "Impossible zoom level {level} in mbtiles");

			let y = (1i64 << level) - 1 - tms_row;
			let coord = u32::try_from(column)
				.ok()
				.zip(u32::try_from(y).ok())
				.and_then(|(x, y)| TileCoord::new(level as u8, x, y).ok())
				.with_context(|| format!("Impossible tile {level}/{column}/{y} in mbtiles"))?;
			tiles.push((coord, Blob::from(data)));
		}

		log::debug!("read {} tiles of levels {min_level}..={max_level}", tiles.len());
		Ok(tiles)
	}
}

impl Debug for MBTilesSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesSource").field("name", &self.name).finish()
	}
}
