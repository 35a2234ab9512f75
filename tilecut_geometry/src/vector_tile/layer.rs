//! Vector tile **layer**.
//!
//! The encoding follows the MVT schema:
//!  * field 1: `name` (string)
//!  * field 2: repeated `feature` (embedded message)
//!  * field 3: repeated `keys` (string)
//!  * field 4: repeated `values` (embedded message)
//!  * field 5: `extent` (varint, default 4096)
//!  * field 15: `version` (varint, default 1)

use super::{GeoValue, VectorTileFeature, property_manager::PropertyManager};
use anyhow::{Context, Result, anyhow, bail, ensure};
use tilecut_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

/// A named layer with features, key/value dictionaries, extent and version.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileLayer {
	/// Size of the local coordinate space (default 4096).
	pub extent: u32,
	pub features: Vec<VectorTileFeature>,
	pub name: String,
	pub property_manager: PropertyManager,
	pub version: u32,
}

impl VectorTileLayer {
	#[must_use]
	pub fn new(name: String, extent: u32, version: u32) -> VectorTileLayer {
		VectorTileLayer {
			extent,
			features: vec![],
			name,
			property_manager: PropertyManager::default(),
			version,
		}
	}

	#[must_use]
	pub fn new_standard(name: &str) -> VectorTileLayer {
		VectorTileLayer::new(name.to_string(), 4096, 1)
	}

	/// Copies name, extent, version and dictionaries, leaving out the features.
	#[must_use]
	pub fn new_empty_like(&self) -> VectorTileLayer {
		VectorTileLayer {
			extent: self.extent,
			features: vec![],
			name: self.name.clone(),
			property_manager: self.property_manager.clone(),
			version: self.version,
		}
	}

	pub fn read(reader: &mut dyn ValueReader<'_>) -> Result<VectorTileLayer> {
		let mut extent = 4096;
		let mut features: Vec<VectorTileFeature> = Vec::new();
		let mut name = None;
		let mut property_manager = PropertyManager::new();
		let mut version = 1;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => name = Some(reader.read_pbf_string().context("Failed to read layer name")?),
				(2, 2) => features.push(
					VectorTileFeature::read(
						reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for feature")?
							.as_mut(),
					)
					.context("Failed to read VectorTileFeature")?,
				),
				(3, 2) => {
					property_manager.push_key(reader.read_pbf_string().context("Failed to read property key")?);
				}
				(4, 2) => {
					property_manager.push_val(
						GeoValue::read(
							reader
								.get_pbf_sub_reader()
								.context("Failed to get PBF sub-reader for property value")?
								.as_mut(),
						)
						.context("Failed to read GeoValue")?,
					);
				}
				(5, 0) => extent = u32::try_from(reader.read_varint().context("Failed to read extent")?)?,
				(15, 0) => version = u32::try_from(reader.read_varint().context("Failed to read version")?)?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		let name = name.ok_or(anyhow!("Layer name is required"))?;
		ensure!(extent > 0, "layer '{name}' has an extent of 0");

		Ok(VectorTileLayer {
			extent,
			features,
			name,
			property_manager,
			version,
		})
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new();

		writer.write_pbf_key(1, 2)?;
		writer.write_pbf_string(&self.name).context("Failed to write layer name")?;

		for feature in &self.features {
			writer.write_pbf_key(2, 2)?;
			writer
				.write_pbf_blob(&feature.to_blob().context("Failed to convert feature to blob")?)
				.context("Failed to write feature blob")?;
		}

		for key in self.property_manager.iter_key() {
			writer.write_pbf_key(3, 2)?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in self.property_manager.iter_val() {
			writer.write_pbf_key(4, 2)?;
			writer
				.write_pbf_blob(&value.to_blob().context("Failed to convert property value to blob")?)
				.context("Failed to write property value blob")?;
		}

		if self.extent != 4096 {
			writer.write_pbf_key(5, 0)?;
			writer.write_varint(u64::from(self.extent)).context("Failed to write extent")?;
		}

		if self.version != 1 {
			writer.write_pbf_key(15, 0)?;
			writer
				.write_varint(u64::from(self.version))
				.context("Failed to write version")?;
		}

		Ok(writer.into_blob())
	}

	/// Resolves the attributes of `feature` through this layer's dictionaries.
	pub fn decode_properties(&self, feature: &VectorTileFeature) -> Result<Vec<(&String, &GeoValue)>> {
		self
			.property_manager
			.decode_tag_ids(&feature.tag_ids)
			.with_context(|| format!("Failed to decode tags of a feature in layer '{}'", self.name))
	}
}
