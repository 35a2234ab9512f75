mod blob;
pub use blob::*;

mod tile_coord;
pub use tile_coord::*;
