//! Integer grid arithmetic for splitting one layer into `n × n` cells.

use anyhow::{Result, ensure};
use std::fmt::Debug;

/// Largest supported subdivision depth.
pub const MAX_DEPTH: u8 = 16;

/// Inclusive axis-aligned rectangle in layer coordinates.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BBox {
	pub x_min: i64,
	pub y_min: i64,
	pub x_max: i64,
	pub y_max: i64,
}

impl BBox {
	pub fn new(x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> BBox {
		BBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
	}

	/// Bounding box of `points`, or `None` if there are none.
	pub fn from_points(points: impl IntoIterator<Item = (i64, i64)>) -> Option<BBox> {
		let mut iter = points.into_iter();
		let (x, y) = iter.next()?;
		let mut bbox = BBox::new(x, y, x, y);
		for (x, y) in iter {
			bbox.x_min = bbox.x_min.min(x);
			bbox.y_min = bbox.y_min.min(y);
			bbox.x_max = bbox.x_max.max(x);
			bbox.y_max = bbox.y_max.max(y);
		}
		Some(bbox)
	}

	pub fn buffered(&self, buffer: i64) -> BBox {
		BBox::new(
			self.x_min - buffer,
			self.y_min - buffer,
			self.x_max + buffer,
			self.y_max + buffer,
		)
	}

	pub fn contains(&self, x: i64, y: i64) -> bool {
		x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
	}
}

impl Debug for BBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "BBox[{}, {}, {}, {}]", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}

/// Inclusive range of cell indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl CellRange {
	pub fn single(x: u32, y: u32) -> CellRange {
		CellRange {
			x_min: x,
			y_min: y,
			x_max: x,
			y_max: y,
		}
	}

	pub fn is_single(&self) -> bool {
		self.x_min == self.x_max && self.y_min == self.y_max
	}

	pub fn contains(&self, x: u32, y: u32) -> bool {
		x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
	}

	/// All cells, column by column.
	pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
		(self.x_min..=self.x_max).flat_map(move |x| (self.y_min..=self.y_max).map(move |y| (x, y)))
	}
}

/// Cell layout of one layer: `size × size` cells of `cell_extent` units each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
	pub size: u32,
	pub cell_extent: i64,
	pub buffer: i64,
}

impl Grid {
	pub fn new(extent: u32, depth: u8) -> Result<Grid> {
		ensure!(depth <= MAX_DEPTH, "subdivision depth {depth} is too large (maximum is {MAX_DEPTH})");
		ensure!(extent > 0, "layer extent must be positive");
		let size = 1u32 << depth;
		ensure!(
			extent.is_multiple_of(size),
			"layer extent {extent} is not divisible into {size} cells"
		);
		let cell_extent = i64::from(extent / size);
		let buffer = (cell_extent * 5 / 256).max(1);
		ensure!(buffer > 0, "cell buffer must not be zero");
		Ok(Grid {
			size,
			cell_extent,
			buffer,
		})
	}

	pub fn cell_count(&self) -> usize {
		(self.size as usize) * (self.size as usize)
	}

	/// Cell column (or row) containing `v`; may lie outside `0..size`.
	pub fn column_of(&self, v: i64) -> i64 {
		v.div_euclid(self.cell_extent)
	}

	pub fn is_on_grid_line(&self, v: i64) -> bool {
		v.rem_euclid(self.cell_extent) == 0
	}

	fn clamped_cell(&self, v: i64) -> u32 {
		self.column_of(v).clamp(0, i64::from(self.size - 1)) as u32
	}

	/// Cells touched by `bbox` grown by the buffer. Features without coordinates land in cell `(0, 0)`.
	pub fn cell_range(&self, bbox: Option<BBox>) -> CellRange {
		let Some(bbox) = bbox else {
			return CellRange::single(0, 0);
		};
		let bbox = bbox.buffered(self.buffer);
		CellRange {
			x_min: self.clamped_cell(bbox.x_min),
			y_min: self.clamped_cell(bbox.y_min),
			x_max: self.clamped_cell(bbox.x_max),
			y_max: self.clamped_cell(bbox.y_max),
		}
	}

	/// Clipping rectangle of cell `(x, y)`, including the buffer.
	pub fn cell_rect(&self, x: u32, y: u32) -> BBox {
		let x0 = i64::from(x) * self.cell_extent;
		let y0 = i64::from(y) * self.cell_extent;
		BBox::new(x0, y0, x0 + self.cell_extent, y0 + self.cell_extent).buffered(self.buffer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(4096, 0, 1, 4096, 80)]
	#[case(4096, 1, 2, 2048, 40)]
	#[case(4096, 3, 8, 512, 10)]
	#[case(4096, 12, 4096, 1, 1)]
	#[case(256, 2, 4, 64, 1)]
	fn grid_sizes(
		#[case] extent: u32,
		#[case] depth: u8,
		#[case] size: u32,
		#[case] cell_extent: i64,
		#[case] buffer: i64,
	) -> Result<()> {
		assert_eq!(
			Grid::new(extent, depth)?,
			Grid {
				size,
				cell_extent,
				buffer
			}
		);
		Ok(())
	}

	#[rstest]
	#[case(4096, 13)]
	#[case(100, 3)]
	#[case(4096, 17)]
	#[case(0, 0)]
	fn invalid_grids(#[case] extent: u32, #[case] depth: u8) {
		assert!(Grid::new(extent, depth).is_err());
	}

	#[test]
	fn floor_division_for_negative_coordinates() -> Result<()> {
		let grid = Grid::new(4096, 1)?;
		assert_eq!(grid.column_of(-1), -1);
		assert_eq!(grid.column_of(2047), 0);
		assert_eq!(grid.column_of(2048), 1);
		assert!(grid.is_on_grid_line(-2048));
		assert!(!grid.is_on_grid_line(-2047));
		Ok(())
	}

	#[test]
	fn cell_range_is_buffered_and_clamped() -> Result<()> {
		let grid = Grid::new(4096, 1)?;
		let range = grid.cell_range(BBox::from_points([(100, 100), (2000, 200)]));
		assert_eq!(range, CellRange::single(0, 0));

		let range = grid.cell_range(BBox::from_points([(100, 100), (2010, 200)]));
		assert_eq!(range.x_max, 1);
		assert!(!range.is_single());

		let range = grid.cell_range(BBox::from_points([(-500, -500), (9000, 9000)]));
		assert_eq!(range.cells().count(), 4);

		assert_eq!(grid.cell_range(None), CellRange::single(0, 0));
		Ok(())
	}

	#[test]
	fn cells_iterate_column_by_column() {
		let range = CellRange {
			x_min: 0,
			y_min: 1,
			x_max: 1,
			y_max: 2,
		};
		assert_eq!(range.cells().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (1, 1), (1, 2)]);
	}

	#[test]
	fn cell_rect() -> Result<()> {
		let grid = Grid::new(4096, 1)?;
		assert_eq!(grid.cell_rect(1, 0), BBox::new(2008, -40, 4136, 2088));
		assert!(grid.cell_rect(0, 0).contains(2088, 2088));
		assert!(!grid.cell_rect(0, 0).contains(2089, 0));
		Ok(())
	}
}
