use super::{
	GeomType,
	geometry::{GeomOp, decode_geometry, encode_geometry},
};
use anyhow::{Context, Result, bail};
use tilecut_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geometry: Vec<GeomOp>,
	/// 0 for a whole feature, otherwise the id shared by all fragments of a feature that spans
	/// several sub-tiles. Never written to the wire.
	pub clip_id: u64,
}

impl VectorTileFeature {
	/// Decodes a `VectorTileFeature` from a protobuf message.
	pub fn read(reader: &mut dyn ValueReader<'_>) -> Result<VectorTileFeature> {
		let mut f = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => f.id = Some(reader.read_varint().context("Failed to read feature ID")?),
				(2, 2) => f.tag_ids = reader.read_pbf_packed_uint32().context("Failed to read tag IDs")?,
				(3, 0) => f.geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?),
				(4, 2) => {
					let data = reader.read_pbf_blob().context("Failed to read geometry data")?;
					f.geometry = decode_geometry(&data).context("Failed to decode geometry")?;
				}
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(f)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0)?;
			writer.write_varint(id).context("Failed to write feature ID")?;
		}

		if !self.tag_ids.is_empty() {
			writer.write_pbf_key(2, 2)?;
			writer
				.write_pbf_packed_uint32(&self.tag_ids)
				.context("Failed to write tag IDs")?;
		}

		writer.write_pbf_key(3, 0)?;
		writer
			.write_varint(self.geom_type.as_u64())
			.context("Failed to write geometry type")?;

		if !self.geometry.is_empty() {
			writer.write_pbf_key(4, 2)?;
			writer
				.write_pbf_blob(&encode_geometry(&self.geometry)?)
				.context("Failed to write geometry data")?;
		}

		Ok(writer.into_blob())
	}

	/// A copy with the same type, id, tags and clip id but no geometry.
	pub fn new_placeholder(&self, clip_id: u64) -> VectorTileFeature {
		VectorTileFeature {
			id: self.id,
			tag_ids: self.tag_ids.clone(),
			geom_type: self.geom_type,
			geometry: Vec::new(),
			clip_id,
		}
	}

	/// Iterates over the vertices of MoveTo and LineTo ops.
	pub fn coordinates(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
		self.geometry.iter().filter(|op| op.has_coordinate()).map(|op| (op.x, op.y))
	}
}
