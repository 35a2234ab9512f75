//! GeoJSON output for decoded vector tiles.
//!
//! Tile-local coordinates are projected to WGS84 longitude/latitude with
//! [`TileCoord::local_to_geo`]. A tile becomes a `FeatureCollection` of per-layer
//! `FeatureCollection`s, mirroring the layer structure of the tile.

mod geometry;

pub use geometry::geometry_to_geojson;

use crate::vector_tile::{VectorTile, VectorTileFeature, VectorTileLayer};
use anyhow::Result;
use tilecut_core::{
	TileCoord,
	json::{JsonArray, JsonObject, JsonValue},
};

/// Converts one feature of `layer`, located in tile `coord`, to a GeoJSON `Feature`.
pub fn feature_to_geojson(feature: &VectorTileFeature, layer: &VectorTileLayer, coord: &TileCoord) -> Result<JsonObject> {
	let mut properties = JsonObject::new();
	for (key, value) in layer.decode_properties(feature)? {
		properties.set(key, value.to_json());
	}

	let extent = layer.extent;
	let geometry = geometry_to_geojson(feature, |x, y| coord.local_to_geo(x as f64, y as f64, extent));

	let mut object = JsonObject::new();
	object.set("type", "Feature");
	if let Some(id) = feature.id {
		object.set("id", id);
	}
	object.set("properties", properties);
	object.set("geometry", geometry);
	Ok(object)
}

/// Converts a layer to a `FeatureCollection` whose properties carry name, version and extent.
pub fn layer_to_geojson(layer: &VectorTileLayer, coord: &TileCoord) -> Result<JsonObject> {
	let mut properties = JsonObject::new();
	properties.set("layer", &layer.name);
	properties.set("version", layer.version);
	properties.set("extent", layer.extent);

	let mut features = JsonArray::default();
	for feature in &layer.features {
		features.push(feature_to_geojson(feature, layer, coord)?);
	}

	let mut collection = JsonObject::new();
	collection.set("type", "FeatureCollection");
	collection.set("properties", properties);
	collection.set("features", features);
	Ok(collection)
}

/// Converts a tile to a `FeatureCollection` of layer collections.
///
/// If `layer_names` is not empty, only layers with one of these names are included.
pub fn tile_to_geojson(tile: &VectorTile, coord: &TileCoord, layer_names: &[String]) -> Result<JsonObject> {
	let mut properties = JsonObject::new();
	properties.set("zoom", coord.level);
	properties.set("x", coord.x);
	properties.set("y", coord.y);

	let mut layers = JsonArray::default();
	for layer in &tile.layers {
		if !layer_names.is_empty() && !layer_names.contains(&layer.name) {
			continue;
		}
		layers.push(layer_to_geojson(layer, coord)?);
	}

	let mut collection = JsonObject::new();
	collection.set("type", "FeatureCollection");
	collection.set("properties", properties);
	collection.set("features", layers);
	Ok(collection)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::vector_tile::{GeoValue, GeomOp, GeomType};
	use approx::assert_relative_eq;
	use pretty_assertions::assert_eq;

	fn example_tile() -> VectorTile {
		let mut layer = VectorTileLayer::new_standard("places");
		layer.property_manager.add_key("name".to_string());
		layer.property_manager.add_val(GeoValue::from("Null Island"));
		layer.features.push(VectorTileFeature {
			id: Some(1),
			tag_ids: vec![0, 0],
			geom_type: GeomType::MultiPoint,
			geometry: vec![GeomOp::move_to(2048, 2048)],
			clip_id: 0,
		});
		let roads = VectorTileLayer::new_standard("roads");
		VectorTile::new(vec![layer, roads])
	}

	#[test]
	fn feature_at_the_centre_of_the_world() -> Result<()> {
		let tile = example_tile();
		let layer = &tile.layers[0];
		let coord = TileCoord::new(0, 0, 0)?;
		let json = JsonValue::from(feature_to_geojson(&layer.features[0], layer, &coord)?).stringify();
		assert_eq!(
			json,
			r#"{"geometry":{"coordinates":[0,0],"type":"Point"},"id":1,"properties":{"name":"Null Island"},"type":"Feature"}"#
		);
		Ok(())
	}

	#[test]
	fn layer_collection() -> Result<()> {
		let tile = example_tile();
		let collection = layer_to_geojson(&tile.layers[0], &TileCoord::new(0, 0, 0)?)?;
		assert_eq!(
			collection.get("properties").map(JsonValue::stringify),
			Some(r#"{"extent":4096,"layer":"places","version":1}"#.to_string())
		);
		assert_eq!(collection.get("type"), Some(&JsonValue::from("FeatureCollection")));
		Ok(())
	}

	#[test]
	fn tile_collection_with_layer_filter() -> Result<()> {
		let tile = example_tile();
		let coord = TileCoord::new(3, 4, 2)?;
		let all = tile_to_geojson(&tile, &coord, &[])?;
		let Some(JsonValue::Array(layers)) = all.get("features") else {
			panic!("features missing");
		};
		assert_eq!(layers.len(), 2);

		let filtered = tile_to_geojson(&tile, &coord, &["roads".to_string()])?;
		let Some(JsonValue::Array(layers)) = filtered.get("features") else {
			panic!("features missing");
		};
		assert_eq!(layers.len(), 1);
		assert_eq!(
			filtered.get("properties").map(JsonValue::stringify),
			Some(r#"{"x":4,"y":2,"zoom":3}"#.to_string())
		);
		Ok(())
	}

	#[test]
	fn projection_uses_the_tile_position() -> Result<()> {
		let coord = TileCoord::new(1, 1, 0)?;
		let [lon, lat] = coord.local_to_geo(0.0, 4096.0, 4096);
		assert_relative_eq!(lon, 0.0);
		assert_relative_eq!(lat, 0.0, epsilon = 1e-9);
		Ok(())
	}

	#[test]
	fn bad_tags_fail() {
		let mut tile = example_tile();
		tile.layers[0].features[0].tag_ids = vec![0, 3];
		let layer = &tile.layers[0];
		assert!(feature_to_geojson(&layer.features[0], layer, &TileCoord::new(0, 0, 0).unwrap()).is_err());
	}
}
