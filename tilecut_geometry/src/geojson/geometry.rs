//! Conversion of feature command streams into GeoJSON geometry objects.

use crate::vector_tile::{GeomCommand, GeomType, VectorTileFeature};
use tilecut_core::json::{JsonArray, JsonObject, JsonValue};

type Ring = Vec<(i64, i64)>;

/// Twice the signed area of a ring in tile space. Positive for outer rings (clockwise with y
/// pointing down).
fn ring_area2(ring: &[(i64, i64)]) -> i128 {
	let n = ring.len();
	(0..n)
		.map(|k| {
			let (x0, y0) = ring[k];
			let (x1, y1) = ring[(k + 1) % n];
			i128::from(x0) * i128::from(y1) - i128::from(y0) * i128::from(x1)
		})
		.sum()
}

/// Splits a command stream into paths, one per MoveTo. ClosePath repeats the first vertex.
fn paths(feature: &VectorTileFeature) -> Vec<Ring> {
	let mut paths: Vec<Ring> = Vec::new();
	for op in &feature.geometry {
		match op.command {
			GeomCommand::MoveTo => paths.push(vec![(op.x, op.y)]),
			GeomCommand::LineTo => {
				if let Some(path) = paths.last_mut() {
					path.push((op.x, op.y));
				}
			}
			GeomCommand::ClosePath => {
				if let Some(path) = paths.last_mut() {
					let first = path[0];
					path.push(first);
				}
			}
		}
	}
	paths
}

/// Groups rings into polygons: every ring with a non-negative area, and the very first ring,
/// starts a new polygon, the others are holes of the polygon before them.
fn group_rings(rings: Vec<Ring>) -> Vec<Vec<Ring>> {
	let mut polygons: Vec<Vec<Ring>> = Vec::new();
	for ring in rings {
		let is_outer = ring_area2(&ring) >= 0;
		match polygons.last_mut() {
			Some(polygon) if !is_outer => polygon.push(ring),
			_ => {
				if !is_outer {
					log::debug!("polygon begins with an inner ring");
				}
				polygons.push(vec![ring]);
			}
		}
	}
	polygons
}

fn position(point: (i64, i64), project: &impl Fn(i64, i64) -> [f64; 2]) -> JsonValue {
	let [lon, lat] = project(point.0, point.1);
	JsonValue::from([round6(lon), round6(lat)])
}

fn round6(value: f64) -> f64 {
	(value * 1e6).round() / 1e6
}

fn positions(points: &[(i64, i64)], project: &impl Fn(i64, i64) -> [f64; 2]) -> JsonValue {
	JsonValue::Array(JsonArray(points.iter().map(|p| position(*p, project)).collect()))
}

fn nested<T>(items: &[T], f: impl Fn(&T) -> JsonValue) -> JsonValue {
	JsonValue::Array(JsonArray(items.iter().map(f).collect()))
}

fn geometry(kind: &str, coordinates: JsonValue) -> JsonValue {
	let mut object = JsonObject::new();
	object.set("type", kind);
	object.set("coordinates", coordinates);
	JsonValue::Object(object)
}

/// Builds the GeoJSON geometry of `feature`, projecting every vertex with `project`.
///
/// Features without coordinates, or of unknown type, give `null`.
pub fn geometry_to_geojson(feature: &VectorTileFeature, project: impl Fn(i64, i64) -> [f64; 2]) -> JsonValue {
	let paths = paths(feature);
	if paths.is_empty() {
		return JsonValue::Null;
	}

	match feature.geom_type {
		GeomType::MultiPoint => {
			let points: Ring = paths.concat();
			if points.len() == 1 {
				geometry("Point", position(points[0], &project))
			} else {
				geometry("MultiPoint", positions(&points, &project))
			}
		}
		GeomType::MultiLineString => {
			if paths.len() == 1 {
				geometry("LineString", positions(&paths[0], &project))
			} else {
				geometry("MultiLineString", nested(&paths, |p| positions(p, &project)))
			}
		}
		GeomType::MultiPolygon => {
			if paths.iter().any(|ring| ring.len() < 2 || ring.first() != ring.last()) {
				log::debug!("polygon ring does not end with ClosePath");
			}
			let polygons = group_rings(paths);
			let polygon = |rings: &Vec<Ring>| nested(rings, |r| positions(r, &project));
			if polygons.len() == 1 {
				geometry("Polygon", polygon(&polygons[0]))
			} else {
				geometry("MultiPolygon", nested(&polygons, polygon))
			}
		}
		GeomType::Unknown => JsonValue::Null,
	}
}
