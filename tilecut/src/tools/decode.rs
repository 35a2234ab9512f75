use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tilecut::{
	core::{
		Blob, TileCoord,
		compression::decompress_if_gzip,
		json::{JsonArray, JsonObject, JsonValue},
	},
	geometry::{
		geojson::tile_to_geojson,
		vector_tile::{GeomType, VectorTile},
	},
	source::{TileSource, get_tile_with_fallback, open_source},
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// mbtiles file, tile directory (z/x/y.pbf) or a single raw tile
	#[arg()]
	input: String,

	/// zoom level of a single tile to decode
	#[arg(requires_all = ["x", "y"])]
	zoom: Option<u8>,

	/// column of the tile
	#[arg()]
	x: Option<u32>,

	/// row of the tile (XYZ scheme)
	#[arg()]
	y: Option<u32>,

	/// decode only layers with this name, can be repeated
	#[arg(long = "layer", short = 'l', value_name = "LAYER", display_order = 1)]
	layers: Vec<String>,

	/// maximum zoom level when decoding all tiles
	#[arg(long, short = 'z', value_name = "int", default_value_t = 32, display_order = 2)]
	max_zoom: u8,

	/// minimum zoom level when decoding all tiles
	#[arg(long, short = 'Z', value_name = "int", default_value_t = 0, display_order = 2)]
	min_zoom: u8,

	/// print per-tile statistics instead of GeoJSON
	#[arg(long, display_order = 3)]
	stats: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let source = open_source(Path::new(&arguments.input))?;
	let output = decode(arguments, source.as_ref())?;
	println!("{}", output.stringify());
	Ok(())
}

fn decode(arguments: &Subcommand, source: &dyn TileSource) -> Result<JsonValue> {
	if let (Some(zoom), Some(x), Some(y)) = (arguments.zoom, arguments.x, arguments.y) {
		let requested = TileCoord::new(zoom, x, y)?;
		let (coord, blob) = get_tile_with_fallback(source, requested)?
			.ok_or_else(|| anyhow!("{}: tile {requested} not found", source.name()))?;
		return decode_tile(&coord, blob, arguments);
	}

	let tiles = source.tiles(arguments.min_zoom, arguments.max_zoom)?;
	log::info!("decoding {} tiles from {}", tiles.len(), source.name());

	let mut features = JsonArray::default();
	for (coord, blob) in tiles {
		features.push(decode_tile(&coord, blob, arguments)?);
	}

	if arguments.stats {
		return Ok(JsonValue::Array(features));
	}

	let mut properties = JsonObject::new();
	for (name, value) in source.metadata()? {
		properties.set(&name, value);
	}

	let mut collection = JsonObject::new();
	collection.set("type", "FeatureCollection");
	collection.set("properties", properties);
	collection.set("features", features);
	Ok(JsonValue::Object(collection))
}

fn decode_tile(coord: &TileCoord, blob: Blob, arguments: &Subcommand) -> Result<JsonValue> {
	let bytes = blob.len();
	let (data, compressed) =
		decompress_if_gzip(blob).with_context(|| format!("Couldn't decompress tile {coord}"))?;
	let tile = VectorTile::from_blob(&data).with_context(|| format!("PBF decoding error in tile {coord}"))?;

	if arguments.stats {
		Ok(JsonValue::Object(tile_stats(&tile, coord, bytes, compressed)))
	} else {
		Ok(JsonValue::Object(tile_to_geojson(&tile, coord, &arguments.layers)?))
	}
}

/// Size, compression and per-layer feature counts of one tile.
fn tile_stats(tile: &VectorTile, coord: &TileCoord, bytes: u64, compressed: bool) -> JsonObject {
	let mut layers = JsonObject::new();
	for layer in &tile.layers {
		let count = |geom_type: GeomType| layer.features.iter().filter(|f| f.geom_type == geom_type).count();

		let mut entry = JsonObject::new();
		entry.set("points", count(GeomType::MultiPoint));
		entry.set("lines", count(GeomType::MultiLineString));
		entry.set("polygons", count(GeomType::MultiPolygon));
		entry.set("extent", layer.extent);
		layers.set(&layer.name, entry);
	}

	let mut stats = JsonObject::new();
	stats.set("zoom", coord.level);
	stats.set("x", coord.x);
	stats.set("y", coord.y);
	stats.set("bytes", bytes);
	stats.set("compressed", compressed);
	stats.set("layers", layers);
	stats
}
