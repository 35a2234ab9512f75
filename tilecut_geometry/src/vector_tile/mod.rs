//! Mapbox Vector Tile model and protobuf codec.
//!
//! A [`VectorTile`] holds [`VectorTileLayer`]s, each with its key/value dictionaries and a list of
//! [`VectorTileFeature`]s. Feature geometry is decoded into [`GeomOp`] command streams with absolute
//! coordinates.

mod feature;
mod geometry;
mod geometry_type;
mod layer;
mod property_manager;
mod tile;
mod value;

pub use feature::VectorTileFeature;
pub use geometry::{GeomCommand, GeomOp, decode_geometry, encode_geometry};
pub use geometry_type::GeomType;
pub use layer::VectorTileLayer;
pub use property_manager::{PropertyManager, VTLPMap};
pub use tile::VectorTile;
pub use value::GeoValue;
