//! Splits a vector tile into an `n × n` grid of sub-tiles and merges the pieces back together.
//!
//! The pipeline runs in five steps:
//!
//! 1. **partition**: every layer is copied into every cell, every feature gets a placeholder in
//!    every cell, and features whose buffered bounding box touches more than one cell get a
//!    shared clip id.
//! 2. **split**: line geometry gets phantom vertices wherever it crosses a grid line, and vertices
//!    on grid lines get stable point ids.
//! 3. **clip**: the split line is clipped to each touched cell, grown by a small buffer.
//! 4. **trim**: empty features and layers are removed from every cell.
//! 5. **reassemble**: whole features are merged into one tile by layer name. Fragments of split
//!    features are collected by clip id.
//!
//! ```rust
//! use tilecut_geometry::{split::split_and_merge, vector_tile::*};
//!
//! let mut layer = VectorTileLayer::new_standard("roads");
//! layer.features.push(VectorTileFeature {
//! 	geom_type: GeomType::MultiLineString,
//! 	geometry: vec![GeomOp::move_to(0, 100), GeomOp::line_to(4096, 100)],
//! 	..Default::default()
//! });
//!
//! let result = split_and_merge(&VectorTile::new(vec![layer]), 1).unwrap();
//! assert_eq!(result.unstitched().len(), 2);
//! ```

mod boundary;
mod clip;
mod grid;
mod ids;
mod partition;
mod reassemble;
mod trim;

pub use boundary::{promote_grid_points, split_at_grid_lines};
pub use clip::clip_to_rect;
pub use grid::{BBox, CellRange, Grid, MAX_DEPTH};
pub use ids::IdPool;
pub use partition::SubTiles;
pub use reassemble::{FragmentRef, UnstitchedFragments};
pub use trim::trim_empty;

use crate::vector_tile::VectorTile;
use anyhow::Result;

/// Outcome of [`split_and_merge`].
#[derive(Clone, Debug)]
pub struct SplitResult {
	pub tile: VectorTile,
	unstitched: UnstitchedFragments,
}

impl SplitResult {
	/// Fragments of features that spanned several cells and could not be merged.
	pub fn unstitched(&self) -> &UnstitchedFragments {
		&self.unstitched
	}

	pub fn into_parts(self) -> (VectorTile, UnstitchedFragments) {
		(self.tile, self.unstitched)
	}
}

/// Splits `tile` into `2^depth × 2^depth` cells, clips line features at the cell boundaries and
/// merges everything back.
///
/// Features that stay within one cell come back unchanged apart from point ids. Features that span
/// several cells are returned as [`UnstitchedFragments`].
pub fn split_and_merge(tile: &VectorTile, depth: u8) -> Result<SplitResult> {
	let mut subtiles = partition::partition_and_clip(tile, depth)?;
	subtiles.iter_mut().for_each(trim_empty);

	let (tile, unstitched) = reassemble::reassemble(subtiles)?;

	if !unstitched.is_empty() {
		log::warn!(
			"{} fragments of {} split features were not stitched back together",
			unstitched.len(),
			unstitched.clip_ids().count()
		);
	}

	Ok(SplitResult { tile, unstitched })
}
