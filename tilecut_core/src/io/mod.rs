//! Protobuf-oriented value readers and writers.
//!
//! Vector tiles are protobuf messages, so everything here is little-endian and centred on
//! varints, zigzag varints, field keys and length-delimited payloads.
//!
//! ```rust
//! use tilecut_core::io::*;
//!
//! let mut writer = ValueWriterBlob::new();
//! writer.write_pbf_key(1, 2).unwrap();
//! writer.write_pbf_string("roads").unwrap();
//! let blob = writer.into_blob();
//!
//! let mut reader = ValueReaderSlice::new(blob.as_slice());
//! assert_eq!(reader.read_pbf_key().unwrap(), (1, 2));
//! assert_eq!(reader.read_pbf_string().unwrap(), "roads");
//! ```

mod value_reader;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use value_reader::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
