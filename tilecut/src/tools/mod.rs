pub mod decode;
pub mod split;
