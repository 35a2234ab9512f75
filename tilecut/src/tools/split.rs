use anyhow::{Context, Result, anyhow};
use std::{collections::BTreeMap, path::Path};
use tilecut::{
	core::{
		TileCoord,
		compression::decompress_if_gzip,
		json::{JsonObject, JsonValue},
	},
	geometry::{
		geojson::tile_to_geojson,
		split::{MAX_DEPTH, SplitResult, split_and_merge},
		vector_tile::VectorTile,
	},
	source::{get_tile_with_fallback, open_source},
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// mbtiles file, tile directory (z/x/y.pbf) or a single raw tile
	#[arg()]
	input: String,

	/// zoom level of the tile
	#[arg()]
	zoom: u8,

	/// column of the tile
	#[arg()]
	x: u32,

	/// row of the tile (XYZ scheme)
	#[arg()]
	y: u32,

	/// split into 2^depth x 2^depth cells
	#[arg(long, short, value_name = "int", default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_DEPTH)), display_order = 1)]
	depth: u8,

	/// print the merged tile as GeoJSON instead of a summary
	#[arg(long, display_order = 2)]
	geojson: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	println!("{}", split(arguments)?.stringify());
	Ok(())
}

fn split(arguments: &Subcommand) -> Result<JsonValue> {
	let source = open_source(Path::new(&arguments.input))?;
	let requested = TileCoord::new(arguments.zoom, arguments.x, arguments.y)?;
	let (coord, blob) = get_tile_with_fallback(source.as_ref(), requested)?
		.ok_or_else(|| anyhow!("{}: tile {requested} not found", source.name()))?;

	let (data, _) = decompress_if_gzip(blob)?;
	let tile = VectorTile::from_blob(&data).with_context(|| format!("PBF decoding error in tile {coord}"))?;

	let result = split_and_merge(&tile, arguments.depth)
		.with_context(|| format!("Failed to split tile {coord} at depth {}", arguments.depth))?;

	if arguments.geojson {
		Ok(JsonValue::Object(tile_to_geojson(&result.tile, &coord, &[])?))
	} else {
		Ok(JsonValue::Object(summary(&tile, &result, &coord, arguments.depth)))
	}
}

/// Feature counts before and after the round trip, plus the fragments that are left over.
fn summary(input: &VectorTile, result: &SplitResult, coord: &TileCoord, depth: u8) -> JsonObject {
	let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
	for layer in &input.layers {
		counts.entry(layer.name.as_str()).or_default().0 += layer.features.len();
	}
	for layer in &result.tile.layers {
		counts.entry(layer.name.as_str()).or_default().1 += layer.features.len();
	}

	let mut layers = JsonObject::new();
	for (name, (features_in, features_out)) in counts {
		let mut entry = JsonObject::new();
		entry.set("features_in", features_in);
		entry.set("features_out", features_out);
		layers.set(name, entry);
	}

	let fragments = result.unstitched();
	let mut unstitched = JsonObject::new();
	for clip_id in fragments.clip_ids() {
		unstitched.set(&clip_id.to_string(), fragments.fragments(clip_id).len());
	}

	let mut object = JsonObject::new();
	object.set("zoom", coord.level);
	object.set("x", coord.x);
	object.set("y", coord.y);
	object.set("depth", depth);
	object.set("features_in", input.feature_count());
	object.set("features_out", result.tile.feature_count());
	object.set("layers", layers);
	object.set("unstitched", unstitched);
	object
}
