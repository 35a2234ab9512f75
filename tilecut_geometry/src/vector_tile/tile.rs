use super::layer::VectorTileLayer;
use anyhow::{Context, Result, bail};
use tilecut_core::{Blob, io::*};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTile {
	pub layers: Vec<VectorTileLayer>,
}

impl VectorTile {
	pub fn new(layers: Vec<VectorTileLayer>) -> VectorTile {
		VectorTile { layers }
	}

	pub fn from_blob(blob: &Blob) -> Result<VectorTile> {
		let mut reader = ValueReaderSlice::new(blob.as_slice());

		let mut tile = VectorTile::default();
		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => {
					tile.layers.push(
						VectorTileLayer::read(
							reader
								.get_pbf_sub_reader()
								.context("Failed to get PBF sub-reader")?
								.as_mut(),
						)
						.context("Failed to read VectorTileLayer")?,
					);
				}
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(tile)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new();

		for layer in &self.layers {
			writer.write_pbf_key(3, 2).context("Failed to write PBF key")?;
			writer
				.write_pbf_blob(&layer.to_blob().context("Failed to convert VectorTileLayer to blob")?)
				.context("Failed to write PBF blob")?;
		}

		Ok(writer.into_blob())
	}

	pub fn find_layer(&self, name: &str) -> Option<&VectorTileLayer> {
		self.layers.iter().find(|layer| layer.name == name)
	}

	/// Index of the first layer called `name`, appending `create()` if there is none.
	pub fn find_or_create_layer(&mut self, name: &str, create: impl FnOnce() -> VectorTileLayer) -> usize {
		if let Some(index) = self.layers.iter().position(|layer| layer.name == name) {
			index
		} else {
			self.layers.push(create());
			self.layers.len() - 1
		}
	}

	pub fn feature_count(&self) -> usize {
		self.layers.iter().map(|layer| layer.features.len()).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::vector_tile::{GeoValue, GeomOp, GeomType, VectorTileFeature};
	use pretty_assertions::assert_eq;

	fn example_tile() -> VectorTile {
		let mut water = VectorTileLayer::new_standard("water");
		water.property_manager.add_key("class".to_string());
		water.property_manager.add_val(GeoValue::from("lake"));
		water.features.push(VectorTileFeature {
			id: None,
			tag_ids: vec![0, 0],
			geom_type: GeomType::MultiPolygon,
			geometry: vec![
				GeomOp::move_to(0, 0),
				GeomOp::line_to(100, 0),
				GeomOp::line_to(100, 100),
				GeomOp::close_path(),
			],
			clip_id: 0,
		});
		let mut pois = VectorTileLayer::new_standard("pois");
		pois.features.push(VectorTileFeature {
			id: Some(42),
			geom_type: GeomType::MultiPoint,
			geometry: vec![GeomOp::move_to(5, 5)],
			..Default::default()
		});
		VectorTile::new(vec![water, pois])
	}

	#[test]
	fn from_to_blob() -> Result<()> {
		let tile1 = example_tile();
		let blob = tile1.to_blob()?;
		let tile2 = VectorTile::from_blob(&blob)?;
		assert_eq!(tile1, tile2);
		assert_eq!(tile2.feature_count(), 2);
		Ok(())
	}

	#[test]
	fn empty_tile() -> Result<()> {
		let tile = VectorTile::from_blob(&Blob::new_empty())?;
		assert!(tile.layers.is_empty());
		Ok(())
	}

	#[test]
	fn garbage_fails() {
		assert!(VectorTile::from_blob(&Blob::from("not a tile")).is_err());
	}

	#[test]
	fn find_or_create() {
		let mut tile = example_tile();
		assert_eq!(tile.find_or_create_layer("pois", || VectorTileLayer::new_standard("x")), 1);
		assert_eq!(tile.find_or_create_layer("roads", || VectorTileLayer::new_standard("roads")), 2);
		assert!(tile.find_layer("roads").is_some());
		assert!(tile.find_layer("rail").is_none());
	}
}
