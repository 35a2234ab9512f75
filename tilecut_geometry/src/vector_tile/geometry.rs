//! Command-stream geometry of a vector tile feature.
//!
//! Geometry is kept in decoded form: one [`GeomOp`] per MoveTo/LineTo vertex and one per
//! ClosePath, with absolute coordinates in the layer's local space. Each op additionally carries
//! a stable `point_id` and a `phantom` flag, used when lines are cut at grid boundaries.
//!
//! The wire encoding is described at
//! <https://github.com/mapbox/vector-tile-spec/blob/master/2.1/README.md#43-geometry-encoding>.

use anyhow::{Context, Result, bail, ensure};
use tilecut_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeomCommand {
	MoveTo,
	LineTo,
	ClosePath,
}

impl GeomCommand {
	fn id(self) -> u32 {
		match self {
			GeomCommand::MoveTo => 1,
			GeomCommand::LineTo => 2,
			GeomCommand::ClosePath => 7,
		}
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeomOp {
	pub command: GeomCommand,
	pub x: i64,
	pub y: i64,
	/// 0 when unassigned, otherwise shared by coincident boundary points of all sub-tiles.
	pub point_id: u64,
	/// Set for vertices synthesized by splitting or clipping.
	pub phantom: bool,
}

impl GeomOp {
	fn new(command: GeomCommand, x: i64, y: i64) -> GeomOp {
		GeomOp {
			command,
			x,
			y,
			point_id: 0,
			phantom: false,
		}
	}

	pub fn move_to(x: i64, y: i64) -> GeomOp {
		GeomOp::new(GeomCommand::MoveTo, x, y)
	}

	pub fn line_to(x: i64, y: i64) -> GeomOp {
		GeomOp::new(GeomCommand::LineTo, x, y)
	}

	pub fn close_path() -> GeomOp {
		GeomOp::new(GeomCommand::ClosePath, 0, 0)
	}

	pub fn phantom(command: GeomCommand, x: i64, y: i64, point_id: u64) -> GeomOp {
		GeomOp {
			command,
			x,
			y,
			point_id,
			phantom: true,
		}
	}

	pub fn is_move_to(&self) -> bool {
		self.command == GeomCommand::MoveTo
	}

	pub fn is_line_to(&self) -> bool {
		self.command == GeomCommand::LineTo
	}

	/// MoveTo and LineTo carry a vertex, ClosePath does not.
	pub fn has_coordinate(&self) -> bool {
		self.command != GeomCommand::ClosePath
	}
}

/// Decodes a packed geometry command stream.
pub fn decode_geometry(blob: &Blob) -> Result<Vec<GeomOp>> {
	let mut reader = ValueReaderSlice::new(blob.as_slice());
	let mut ops = Vec::new();
	let mut x: i64 = 0;
	let mut y: i64 = 0;
	let mut started = false;

	while reader.has_remaining() {
		let value = reader.read_varint().context("Failed to read geometry command")?;
		let command = value & 0x7;
		let count = value >> 3;

		match command {
			1 | 2 => {
				for _ in 0..count {
					let dx = reader.read_svarint().context("Failed to read x coordinate")?;
					let dy = reader.read_svarint().context("Failed to read y coordinate")?;
					x = x.checked_add(dx).context("x coordinate overflows")?;
					y = y.checked_add(dy).context("y coordinate overflows")?;
					ops.push(if command == 1 {
						GeomOp::move_to(x, y)
					} else {
						GeomOp::line_to(x, y)
					});
				}
				started |= command == 1 && count > 0;
			}
			7 => {
				ensure!(started, "ClosePath command found before any MoveTo");
				for _ in 0..count {
					ops.push(GeomOp::close_path());
				}
			}
			_ => bail!("Unknown geometry command {command}"),
		}
	}

	Ok(ops)
}

/// Encodes ops into a packed geometry command stream, merging runs of equal commands.
pub fn encode_geometry(ops: &[GeomOp]) -> Result<Blob> {
	let mut writer = ValueWriterBlob::new();
	let mut x: i64 = 0;
	let mut y: i64 = 0;

	for run in ops.chunk_by(|a, b| a.command == b.command) {
		let count = u32::try_from(run.len())?;
		ensure!(count < (1 << 29), "geometry command repeats {count} times");
		let command = run[0].command;
		writer.write_varint(u64::from((count << 3) | command.id()))?;

		if command != GeomCommand::ClosePath {
			for op in run {
				writer.write_svarint(op.x.checked_sub(x).context("x delta overflows")?)?;
				writer.write_svarint(op.y.checked_sub(y).context("y delta overflows")?)?;
				x = op.x;
				y = op.y;
			}
		}
	}

	Ok(writer.into_blob())
}
