//! Merges the sub-tiles of a split tile back into one tile.

use super::partition::SubTiles;
use crate::vector_tile::{VectorTile, VectorTileFeature, VectorTileLayer};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Position of one feature inside [`SubTiles`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FragmentRef {
	pub cell_index: usize,
	pub layer_index: usize,
	pub feature_index: usize,
}

/// Fragments of features that span several cells, grouped by clip id.
///
/// Joining them back together is not implemented yet. They are kept here, together with the
/// sub-tiles that own them, so nothing is lost.
#[derive(Clone, Debug)]
pub struct UnstitchedFragments {
	subtiles: SubTiles,
	by_clip_id: BTreeMap<u64, Vec<FragmentRef>>,
}

impl UnstitchedFragments {
	/// Total number of fragments.
	pub fn len(&self) -> usize {
		self.by_clip_id.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.by_clip_id.is_empty()
	}

	/// Clip ids in ascending order.
	pub fn clip_ids(&self) -> impl Iterator<Item = u64> + '_ {
		self.by_clip_id.keys().copied()
	}

	pub fn fragments(&self, clip_id: u64) -> &[FragmentRef] {
		self.by_clip_id.get(&clip_id).map(Vec::as_slice).unwrap_or_default()
	}

	/// Looks up the layer and feature a reference points to.
	pub fn resolve(&self, fragment: &FragmentRef) -> Option<(&VectorTileLayer, &VectorTileFeature)> {
		let layer = self
			.subtiles
			.get_by_index(fragment.cell_index)?
			.layers
			.get(fragment.layer_index)?;
		Some((layer, layer.features.get(fragment.feature_index)?))
	}

	pub fn subtiles(&self) -> &SubTiles {
		&self.subtiles
	}
}

/// Collects all whole features (clip id 0) into one tile and records every fragment.
///
/// Output layers are matched by name, the first sub-tile layer with a given name decides extent
/// and version. Attributes are re-encoded into the output layer's dictionaries.
pub fn reassemble(subtiles: SubTiles) -> Result<(VectorTile, UnstitchedFragments)> {
	let mut tile = VectorTile::default();
	let mut by_clip_id: BTreeMap<u64, Vec<FragmentRef>> = BTreeMap::new();

	for (cell_index, cell) in subtiles.iter().enumerate() {
		for (layer_index, layer) in cell.layers.iter().enumerate() {
			for (feature_index, feature) in layer.features.iter().enumerate() {
				let context = || {
					let (x, y) = subtiles.cell_coords(cell_index);
					format!(
						"Failed to re-tag feature {feature_index} of layer '{}' in cell ({x}, {y})",
						layer.name
					)
				};

				if feature.clip_id != 0 {
					layer.property_manager.decode_tag_ids(&feature.tag_ids).with_context(context)?;
					by_clip_id.entry(feature.clip_id).or_default().push(FragmentRef {
						cell_index,
						layer_index,
						feature_index,
					});
					continue;
				}

				let index = tile.find_or_create_layer(&layer.name, || {
					VectorTileLayer::new(layer.name.clone(), layer.extent, layer.version)
				});
				let output = &mut tile.layers[index];
				let tag_ids = output
					.property_manager
					.copy_tag_ids(&layer.property_manager, &feature.tag_ids)
					.with_context(context)?;
				output.features.push(VectorTileFeature {
					tag_ids,
					..feature.clone()
				});
			}
		}
	}

	Ok((tile, UnstitchedFragments { subtiles, by_clip_id }))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		split::{partition::partition_and_clip, trim::trim_empty},
		vector_tile::{GeoValue, GeomOp, GeomType, PropertyManager},
	};

	fn trimmed(tile: &VectorTile, depth: u8) -> Result<SubTiles> {
		let mut subtiles = partition_and_clip(tile, depth)?;
		subtiles.iter_mut().for_each(trim_empty);
		Ok(subtiles)
	}

	fn layer_with(name: &str, extent: u32, features: Vec<VectorTileFeature>) -> VectorTileLayer {
		let mut layer = VectorTileLayer::new(name.to_string(), extent, 2);
		layer.property_manager = PropertyManager::from_slices(&["unused", "kind"], &["unused", "river"]);
		layer.features = features;
		layer
	}

	fn feature(x: i64) -> VectorTileFeature {
		VectorTileFeature {
			tag_ids: vec![1, 1],
			geom_type: GeomType::MultiLineString,
			geometry: vec![GeomOp::move_to(x, 0), GeomOp::line_to(x + 10, 0)],
			..Default::default()
		}
	}

	#[test]
	fn whole_features_are_merged_and_retagged() -> Result<()> {
		let tile = VectorTile::new(vec![layer_with("water", 4096, vec![feature(10), feature(3000)])]);
		let (merged, fragments) = reassemble(trimmed(&tile, 1)?)?;

		assert!(fragments.is_empty());
		assert_eq!(merged.layers.len(), 1);
		let layer = &merged.layers[0];
		assert_eq!((layer.extent, layer.version), (4096, 2));
		assert_eq!(layer.features.len(), 2);
		for f in &layer.features {
			assert_eq!(f.tag_ids, vec![0, 0]);
			assert_eq!(
				layer.decode_properties(f)?,
				vec![(&"kind".to_string(), &GeoValue::from("river"))]
			);
		}
		Ok(())
	}

	#[test]
	fn fragments_are_recorded_not_merged() -> Result<()> {
		let line = VectorTileFeature {
			geom_type: GeomType::MultiLineString,
			geometry: vec![GeomOp::move_to(100, 100), GeomOp::line_to(4000, 100)],
			..Default::default()
		};
		let tile = VectorTile::new(vec![layer_with("water", 4096, vec![line])]);
		let (merged, fragments) = reassemble(trimmed(&tile, 1)?)?;

		assert!(merged.layers.is_empty());
		assert_eq!(fragments.len(), 2);
		assert_eq!(fragments.clip_ids().collect::<Vec<_>>(), vec![1]);
		let refs = fragments.fragments(1);
		assert_eq!(
			refs.iter().map(|r| r.cell_index).collect::<Vec<_>>(),
			vec![0, 2]
		);
		for r in refs {
			let (layer, feature) = fragments.resolve(r).unwrap();
			assert_eq!(layer.name, "water");
			assert_eq!(feature.clip_id, 1);
		}
		assert!(fragments.fragments(2).is_empty());
		Ok(())
	}

	#[test]
	fn layers_with_the_same_name_are_joined() -> Result<()> {
		let tile = VectorTile::new(vec![
			layer_with("water", 4096, vec![feature(10)]),
			layer_with("water", 512, vec![feature(20)]),
			layer_with("roads", 4096, vec![feature(30)]),
		]);
		let (merged, _) = reassemble(trimmed(&tile, 0)?)?;
		assert_eq!(merged.layers.len(), 2);
		assert_eq!(merged.layers[0].name, "water");
		assert_eq!(merged.layers[0].extent, 4096);
		assert_eq!(merged.layers[0].features.len(), 2);
		assert_eq!(merged.layers[1].name, "roads");
		Ok(())
	}

	#[test]
	fn out_of_bounds_tags_fail() -> Result<()> {
		let mut f = feature(10);
		f.tag_ids = vec![0, 9];
		let tile = VectorTile::new(vec![layer_with("water", 4096, vec![f])]);
		assert!(reassemble(trimmed(&tile, 0)?).is_err());
		Ok(())
	}

	#[test]
	fn out_of_bounds_tags_on_a_split_line_fail() -> Result<()> {
		let line = VectorTileFeature {
			tag_ids: vec![0, 9],
			geom_type: GeomType::MultiLineString,
			geometry: vec![GeomOp::move_to(100, 100), GeomOp::line_to(4000, 100)],
			..Default::default()
		};
		let tile = VectorTile::new(vec![layer_with("water", 4096, vec![line])]);
		let subtiles = trimmed(&tile, 1)?;
		assert_eq!(subtiles.get(0, 0).layers[0].features[0].clip_id, 1);

		let error = reassemble(subtiles).unwrap_err();
		assert_eq!(
			error.to_string(),
			"Failed to re-tag feature 0 of layer 'water' in cell (0, 0)"
		);
		Ok(())
	}

	#[test]
	fn odd_tag_count_fails() -> Result<()> {
		let mut f = feature(10);
		f.tag_ids = vec![0];
		let tile = VectorTile::new(vec![layer_with("water", 4096, vec![f])]);
		assert!(reassemble(trimmed(&tile, 0)?).is_err());
		Ok(())
	}
}
