use super::{
	boundary::split_at_grid_lines,
	clip::clip_to_rect,
	grid::{BBox, Grid, MAX_DEPTH},
	ids::IdPool,
};
use crate::vector_tile::{GeomType, VectorTile, VectorTileFeature};
use anyhow::{Context, Result, ensure};

/// The `n × n` sub-tiles of a split tile, stored column by column.
#[derive(Clone, Debug, PartialEq)]
pub struct SubTiles {
	size: u32,
	cells: Vec<VectorTile>,
}

impl SubTiles {
	fn new(size: u32) -> SubTiles {
		let count = (size as usize) * (size as usize);
		SubTiles {
			size,
			cells: vec![VectorTile::default(); count],
		}
	}

	/// Cells per axis.
	pub fn size(&self) -> u32 {
		self.size
	}

	pub fn cell_index(&self, x: u32, y: u32) -> usize {
		(x as usize) * (self.size as usize) + (y as usize)
	}

	pub fn cell_coords(&self, index: usize) -> (u32, u32) {
		let size = self.size as usize;
		((index / size) as u32, (index % size) as u32)
	}

	pub fn get(&self, x: u32, y: u32) -> &VectorTile {
		&self.cells[self.cell_index(x, y)]
	}

	pub fn get_by_index(&self, index: usize) -> Option<&VectorTile> {
		self.cells.get(index)
	}

	pub fn iter(&self) -> impl Iterator<Item = &VectorTile> + '_ {
		self.cells.iter()
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VectorTile> + '_ {
		self.cells.iter_mut()
	}

	fn last_feature_mut(&mut self, x: u32, y: u32, layer_index: usize) -> Result<&mut VectorTileFeature> {
		let index = self.cell_index(x, y);
		self.cells[index]
			.layers
			.get_mut(layer_index)
			.and_then(|layer| layer.features.last_mut())
			.with_context(|| format!("cell ({x}, {y}) has no placeholder in layer {layer_index}"))
	}
}

/// Distributes every feature of `tile` over an `n × n` grid (`n = 2^depth`).
///
/// Every cell receives a copy of every layer and a placeholder for every feature. Line features
/// are split at grid lines and clipped into the cells their buffered bounding box touches, all
/// other features are copied unchanged into cell `(0, 0)`. Point and clip ids are allocated from
/// one [`IdPool`] for the whole tile.
pub(crate) fn partition_and_clip(tile: &VectorTile, depth: u8) -> Result<SubTiles> {
	ensure!(depth <= MAX_DEPTH, "subdivision depth {depth} is too large (maximum is {MAX_DEPTH})");

	let grids = tile
		.layers
		.iter()
		.map(|layer| {
			Grid::new(layer.extent, depth)
				.with_context(|| format!("Failed to build the cell grid for layer '{}'", layer.name))
		})
		.collect::<Result<Vec<Grid>>>()?;

	let mut ids = IdPool::new();
	let mut subtiles = SubTiles::new(1 << depth);

	for ((layer_index, layer), grid) in tile.layers.iter().enumerate().zip(grids) {
		for cell in subtiles.iter_mut() {
			cell.layers.push(layer.new_empty_like());
		}

		for (feature_index, feature) in layer.features.iter().enumerate() {
			split_feature(feature, &grid, &mut subtiles, layer_index, &mut ids)
				.with_context(|| format!("Failed to split feature {feature_index} of layer '{}'", layer.name))?;
		}

		log::debug!(
			"split layer '{}' with {} features into {}x{} cells ({grid:?})",
			layer.name,
			layer.features.len(),
			grid.size,
			grid.size
		);
	}

	log::trace!(
		"allocated {} point ids and {} clip ids",
		ids.point_ids_used(),
		ids.clip_ids_used()
	);

	Ok(subtiles)
}

fn split_feature(
	feature: &VectorTileFeature,
	grid: &Grid,
	subtiles: &mut SubTiles,
	layer_index: usize,
	ids: &mut IdPool,
) -> Result<()> {
	let range = grid.cell_range(BBox::from_points(feature.coordinates()));
	let clip_id = if range.is_single() { 0 } else { ids.next_clip_id() };

	for cell in subtiles.iter_mut() {
		cell.layers[layer_index].features.push(feature.new_placeholder(clip_id));
	}

	match feature.geom_type {
		GeomType::MultiLineString => {
			let split = split_at_grid_lines(&feature.geometry, grid, ids);
			for (x, y) in range.cells() {
				let geometry = clip_to_rect(&split, &grid.cell_rect(x, y))
					.with_context(|| format!("Failed to clip line to cell ({x}, {y})"))?;
				subtiles.last_feature_mut(x, y, layer_index)?.geometry = geometry;
			}
		}
		GeomType::MultiPoint | GeomType::MultiPolygon | GeomType::Unknown => {
			subtiles.last_feature_mut(0, 0, layer_index)?.geometry = feature.geometry.clone();
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::vector_tile::{GeomOp, VectorTileLayer};
	use rstest::rstest;
	use std::collections::BTreeSet;

	fn line(points: &[(i64, i64)]) -> VectorTileFeature {
		let mut geometry = vec![GeomOp::move_to(points[0].0, points[0].1)];
		geometry.extend(points[1..].iter().map(|&(x, y)| GeomOp::line_to(x, y)));
		VectorTileFeature {
			geom_type: GeomType::MultiLineString,
			geometry,
			..Default::default()
		}
	}

	fn tile_of(features: Vec<VectorTileFeature>) -> VectorTile {
		let mut layer = VectorTileLayer::new_standard("lines");
		layer.features = features;
		VectorTile::new(vec![layer])
	}

	fn occupied_cells(subtiles: &SubTiles, feature_index: usize) -> BTreeSet<(u32, u32)> {
		subtiles
			.iter()
			.enumerate()
			.filter(|(_, cell)| !cell.layers[0].features[feature_index].geometry.is_empty())
			.map(|(index, _)| subtiles.cell_coords(index))
			.collect()
	}

	#[test]
	fn every_cell_gets_every_layer_and_placeholder() -> Result<()> {
		let subtiles = partition_and_clip(&tile_of(vec![line(&[(10, 10), (20, 20)]), line(&[(30, 30), (40, 40)])]), 2)?;
		assert_eq!(subtiles.size(), 4);
		assert_eq!(subtiles.iter().count(), 16);
		for cell in subtiles.iter() {
			assert_eq!(cell.layers.len(), 1);
			assert_eq!(cell.layers[0].features.len(), 2);
			assert_eq!(cell.layers[0].extent, 4096);
		}
		Ok(())
	}

	#[test]
	fn grid_coverage_matches_buffered_bbox() -> Result<()> {
		// buffered bbox [480, 480, 2580, 1540] covers columns 0..=2 and rows 0..=1 at depth 2
		let feature = line(&[(500, 500), (2560, 1520)]);
		let grid = Grid::new(4096, 2)?;
		let range = grid.cell_range(BBox::from_points(feature.coordinates()));
		let subtiles = partition_and_clip(&tile_of(vec![feature]), 2)?;

		let occupied = occupied_cells(&subtiles, 0);
		assert!(occupied.iter().all(|&(x, y)| range.contains(x, y)));
		assert_eq!(
			occupied,
			BTreeSet::from([(0, 0), (1, 0), (1, 1), (2, 1)])
		);
		assert_eq!(range.cells().count(), 6);
		Ok(())
	}

	#[test]
	fn marked_cells_equal_the_buffered_cell_range() -> Result<()> {
		let features = vec![
			line(&[(100, 100), (200, 200)]),
			line(&[(500, 500), (2560, 1520)]),
			line(&[(2040, 300), (2045, 310)]),
			line(&[(-50, 4000), (10, 4100)]),
			line(&[(100, 3900), (3900, 100)]),
			line(&[(1100, 1100), (1900, 1900)]),
		];
		let depth = 2;
		let grid = Grid::new(4096, depth)?;
		let subtiles = partition_and_clip(&tile_of(features.clone()), depth)?;

		for (index, feature) in features.iter().enumerate() {
			let range = grid.cell_range(BBox::from_points(feature.coordinates()));
			let split = split_at_grid_lines(&feature.geometry, &grid, &mut IdPool::new());
			let clip_id = subtiles.get(0, 0).layers[0].features[index].clip_id;
			assert_eq!(clip_id != 0, range.cells().count() > 1, "feature {index}");

			for x in 0..grid.size {
				for y in 0..grid.size {
					let placed = &subtiles.get(x, y).layers[0].features[index];
					assert_eq!(placed.clip_id, clip_id);
					let coords: Vec<(i64, i64)> = placed.coordinates().collect();
					if range.contains(x, y) {
						let expected: Vec<(i64, i64)> = clip_to_rect(&split, &grid.cell_rect(x, y))?
							.iter()
							.map(|op| (op.x, op.y))
							.collect();
						assert_eq!(coords, expected, "feature {index} in cell ({x}, {y})");
					} else {
						assert!(coords.is_empty(), "feature {index} outside its range in cell ({x}, {y})");
					}
				}
			}
		}
		Ok(())
	}

	#[test]
	fn clip_ids_are_unique_per_split_feature() -> Result<()> {
		let tile = tile_of(vec![
			line(&[(100, 100), (200, 200)]),
			line(&[(100, 100), (4000, 100)]),
			line(&[(3000, 3000), (3100, 3100)]),
			line(&[(100, 3000), (3000, 3000)]),
		]);
		let subtiles = partition_and_clip(&tile, 1)?;
		let clip_ids: Vec<u64> = subtiles.get(0, 0).layers[0].features.iter().map(|f| f.clip_id).collect();
		assert_eq!(clip_ids, vec![0, 1, 0, 2]);

		for cell in subtiles.iter() {
			let ids: Vec<u64> = cell.layers[0].features.iter().map(|f| f.clip_id).collect();
			assert_eq!(ids, clip_ids);
		}
		Ok(())
	}

	#[test]
	fn crossing_point_is_shared_by_neighbours() -> Result<()> {
		let subtiles = partition_and_clip(&tile_of(vec![line(&[(100, 100), (4000, 100)])]), 1)?;
		let left = &subtiles.get(0, 0).layers[0].features[0].geometry;
		let right = &subtiles.get(1, 0).layers[0].features[0].geometry;

		let shared = |ops: &[GeomOp]| {
			ops
				.iter()
				.find(|op| op.x == 2048)
				.map(|op| (op.point_id, op.phantom))
		};
		assert_eq!(shared(left.as_slice()), Some((1, true)));
		assert_eq!(shared(right.as_slice()), Some((1, true)));
		Ok(())
	}

	#[test]
	fn non_line_features_go_to_the_first_cell() -> Result<()> {
		let mut layer = VectorTileLayer::new_standard("pois");
		layer.features.push(VectorTileFeature {
			geom_type: GeomType::MultiPoint,
			geometry: vec![GeomOp::move_to(3000, 3000)],
			..Default::default()
		});
		let subtiles = partition_and_clip(&VectorTile::new(vec![layer]), 1)?;
		assert_eq!(
			subtiles.get(0, 0).layers[0].features[0].geometry,
			vec![GeomOp::move_to(3000, 3000)]
		);
		assert!(subtiles.get(1, 1).layers[0].features[0].geometry.is_empty());
		Ok(())
	}

	#[test]
	fn indivisible_extent_fails() {
		let mut tile = tile_of(vec![line(&[(1, 1), (2, 2)])]);
		tile.layers[0].extent = 100;
		assert!(partition_and_clip(&tile, 3).is_err());
	}

	#[rstest]
	#[case(13)]
	#[case(15)]
	#[case(16)]
	fn cells_finer_than_one_unit_fail(#[case] depth: u8) {
		let tile = tile_of(vec![line(&[(1, 1), (2, 2)])]);
		let error = partition_and_clip(&tile, depth).unwrap_err();
		assert_eq!(error.to_string(), "Failed to build the cell grid for layer 'lines'");
	}

	#[test]
	fn later_layer_with_bad_extent_fails() {
		let mut tile = tile_of(vec![line(&[(1, 1), (2, 2)])]);
		let mut second = VectorTileLayer::new("small".to_string(), 100, 2);
		second.features.push(line(&[(1, 1), (2, 2)]));
		tile.layers.push(second);
		let error = partition_and_clip(&tile, 3).unwrap_err();
		assert_eq!(error.to_string(), "Failed to build the cell grid for layer 'small'");
	}

	#[test]
	fn depth_is_checked_without_layers() {
		assert!(partition_and_clip(&VectorTile::default(), 20).is_err());
	}

	#[test]
	fn cell_index_layout() -> Result<()> {
		let subtiles = partition_and_clip(&VectorTile::default(), 2)?;
		assert_eq!(subtiles.cell_index(1, 3), 7);
		assert_eq!(subtiles.cell_coords(7), (1, 3));
		Ok(())
	}
}
