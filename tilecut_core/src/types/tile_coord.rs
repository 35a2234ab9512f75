//! Tile coordinates in a Web Mercator tile pyramid.
//!
//! ```
//! use tilecut_core::TileCoord;
//!
//! let coord = TileCoord::new(3, 4, 2).unwrap();
//! assert_eq!(coord.parent().unwrap(), TileCoord::new(2, 2, 1).unwrap());
//! assert_eq!(coord.flipped_y(), 5);
//! ```

use anyhow::{Result, ensure};
use std::{
	f64::consts::PI,
	fmt::{self, Debug, Display},
};

/// A zoom level plus x/y tile indices (XYZ scheme, y grows southwards).
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	pub level: u8,
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	/// # Errors
	/// Returns an error if `level` > 31 or `x`/`y` are out of range for the level.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		let max = 1u64 << level;
		ensure!(u64::from(x) < max, "x ({x}) out of bounds for level {level}");
		ensure!(u64::from(y) < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Row index in the TMS scheme used by mbtiles (y grows northwards).
	#[must_use]
	pub fn flipped_y(&self) -> u32 {
		((1u64 << self.level) - 1 - u64::from(self.y)) as u32
	}

	/// The tile one level up that contains this one, or `None` at level 0.
	#[must_use]
	pub fn parent(&self) -> Option<TileCoord> {
		if self.level == 0 {
			return None;
		}
		Some(TileCoord {
			level: self.level - 1,
			x: self.x / 2,
			y: self.y / 2,
		})
	}

	/// Projects a tile-local coordinate (`0..extent` on both axes) to `[longitude, latitude]` in degrees.
	///
	/// Coordinates outside `0..extent` (tile buffers) are extrapolated.
	#[must_use]
	pub fn local_to_geo(&self, x: f64, y: f64, extent: u32) -> [f64; 2] {
		let zoom = f64::from(1u32 << self.level.min(31));
		let extent = f64::from(extent);
		let gx = (f64::from(self.x) + x / extent) / zoom;
		let gy = (f64::from(self.y) + y / extent) / zoom;
		[
			(gx - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * gy)).exp().atan() / PI - 0.25) * 360.0,
		]
	}

	/// Northwest corner of the tile as `[longitude, latitude]`.
	#[must_use]
	pub fn as_geo(&self) -> [f64; 2] {
		self.local_to_geo(0.0, 0.0, 1)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}
