//! # tilecut
//!
//! Reads Mapbox vector tiles from mbtiles files, tile directories or single tile files, decodes
//! them to GeoJSON and runs them through the grid split/merge pipeline.
//!
//! ```no_run
//! use tilecut::{core::TileCoord, source::{get_tile_with_fallback, open_source}};
//! use std::path::Path;
//!
//! let source = open_source(Path::new("tiles.mbtiles")).unwrap();
//! let found = get_tile_with_fallback(source.as_ref(), TileCoord::new(14, 8803, 5376).unwrap()).unwrap();
//! ```

pub mod source;

pub use tilecut_core as core;
pub use tilecut_geometry as geometry;
