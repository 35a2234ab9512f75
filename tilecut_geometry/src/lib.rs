//! Vector tile geometry for tilecut.
//!
//! - [`vector_tile`]: the decoded tile model and its protobuf codec.
//! - [`split`]: partitions a tile into a grid of sub-tiles, clips line geometry at the cell
//!   boundaries and reassembles the pieces.
//! - [`geojson`]: renders decoded tiles as GeoJSON feature collections.

pub mod geojson;
pub mod split;
pub mod vector_tile;
