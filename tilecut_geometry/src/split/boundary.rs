//! Inserts phantom vertices where a line crosses a grid line, and marks vertices that sit on a
//! grid line with stable point ids.
//!
//! After [`split_at_grid_lines`] every segment of the path lies within a single cell (boundaries
//! included), so clipping never has to cut a segment in the middle of a neighbouring cell.

use super::{grid::Grid, ids::IdPool};
use crate::vector_tile::{GeomCommand, GeomOp};

#[derive(Clone, Copy)]
enum Axis {
	X,
	Y,
}

impl Axis {
	fn along(self, op: &GeomOp) -> i64 {
		match self {
			Axis::X => op.x,
			Axis::Y => op.y,
		}
	}

	fn across(self, op: &GeomOp) -> i64 {
		match self {
			Axis::X => op.y,
			Axis::Y => op.x,
		}
	}

	fn point(self, along: i64, across: i64) -> (i64, i64) {
		match self {
			Axis::X => (along, across),
			Axis::Y => (across, along),
		}
	}
}

/// Runs the X pass, the Y pass and the promotion pass.
pub fn split_at_grid_lines(ops: &[GeomOp], grid: &Grid, ids: &mut IdPool) -> Vec<GeomOp> {
	let ops = split_axis(ops, grid, ids, Axis::X);
	let mut ops = split_axis(&ops, grid, ids, Axis::Y);
	promote_grid_points(&mut ops, grid, ids);
	ops
}

/// Grid-line positions crossed strictly between `from` and `to`, in travel order.
fn crossings(from: i64, to: i64, grid: &Grid) -> Vec<i64> {
	let c0 = grid.column_of(from);
	let c1 = grid.column_of(to);
	let line = |c: i64| c * grid.cell_extent;
	if c1 > c0 {
		(c0 + 1..=c1).map(line).filter(|&g| g != to).collect()
	} else if c1 < c0 {
		(c1 + 1..=c0).rev().map(line).filter(|&g| g != from).collect()
	} else {
		Vec::new()
	}
}

fn split_axis(ops: &[GeomOp], grid: &Grid, ids: &mut IdPool, axis: Axis) -> Vec<GeomOp> {
	let mut result = Vec::with_capacity(ops.len());
	let mut previous: Option<GeomOp> = None;

	for op in ops {
		if let (true, Some(prev)) = (op.is_line_to(), previous) {
			let (a0, b0) = (axis.along(&prev), axis.across(&prev));
			let (a1, b1) = (axis.along(op), axis.across(op));
			for g in crossings(a0, a1, grid) {
				let b = b0 as f64 + (b1 - b0) as f64 * (g - a0) as f64 / (a1 - a0) as f64;
				let (x, y) = axis.point(g, b.round() as i64);
				result.push(GeomOp::phantom(GeomCommand::LineTo, x, y, ids.next_point_id()));
			}
		}
		if op.has_coordinate() {
			previous = Some(*op);
		}
		result.push(*op);
	}

	result
}

/// Gives every vertex on a grid line that has no id yet a fresh id and clears its phantom flag.
///
/// Vertices that already carry an id keep it, so running this twice changes nothing.
pub fn promote_grid_points(ops: &mut [GeomOp], grid: &Grid, ids: &mut IdPool) {
	for op in ops.iter_mut().filter(|op| op.has_coordinate()) {
		if op.point_id == 0 && (grid.is_on_grid_line(op.x) || grid.is_on_grid_line(op.y)) {
			op.point_id = ids.next_point_id();
			op.phantom = false;
		}
	}
}
