//! Shared building blocks for tilecut: byte blobs, protobuf value I/O, tile coordinates,
//! gzip helpers and a minimal JSON value model.

pub mod compression;
pub mod io;
pub mod json;
pub mod types;

pub use types::*;
