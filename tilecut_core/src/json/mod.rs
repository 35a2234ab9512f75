//! A small JSON value model used to emit GeoJSON and statistics and to read metadata files.

mod parse;
mod stringify;
mod value;

pub use stringify::*;
pub use value::*;
