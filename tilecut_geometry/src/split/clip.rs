//! Clips a line command stream to one cell rectangle.
//!
//! The path is walked once while tracking whether the pen is inside the rectangle. Entering
//! starts a new sub-path at the entry point, leaving ends it at the exit point. Both are phantom
//! vertices without a point id. A segment whose endpoints both lie outside is dropped, even if it
//! passes through the rectangle.

use super::grid::BBox;
use crate::vector_tile::{GeomCommand, GeomOp};
use anyhow::{Result, bail};

/// Parameter range `(t0, t1)` of the part of segment `a → b` inside `rect`, if any (Liang–Barsky).
fn clip_parameters(a: &GeomOp, b: &GeomOp, rect: &BBox) -> Option<(f64, f64)> {
	let (x0, y0) = (a.x as f64, a.y as f64);
	let dx = (b.x - a.x) as f64;
	let dy = (b.y - a.y) as f64;
	let checks = [
		(-dx, x0 - rect.x_min as f64),
		(dx, rect.x_max as f64 - x0),
		(-dy, y0 - rect.y_min as f64),
		(dy, rect.y_max as f64 - y0),
	];

	let mut t0: f64 = 0.0;
	let mut t1: f64 = 1.0;
	for (p, q) in checks {
		if p == 0.0 {
			if q < 0.0 {
				return None;
			}
		} else {
			let r = q / p;
			if p < 0.0 {
				if r > t1 {
					return None;
				}
				t0 = t0.max(r);
			} else {
				if r < t0 {
					return None;
				}
				t1 = t1.min(r);
			}
		}
	}
	Some((t0, t1))
}

fn point_at(a: &GeomOp, b: &GeomOp, t: f64, rect: &BBox) -> (i64, i64) {
	let x = a.x as f64 + (b.x - a.x) as f64 * t;
	let y = a.y as f64 + (b.y - a.y) as f64 * t;
	(
		(x.round() as i64).clamp(rect.x_min, rect.x_max),
		(y.round() as i64).clamp(rect.y_min, rect.y_max),
	)
}

/// Returns the part of `ops` inside `rect`.
///
/// Fails if cleaning up the result would drop a MoveTo that carries a point id.
pub fn clip_to_rect(ops: &[GeomOp], rect: &BBox) -> Result<Vec<GeomOp>> {
	let mut result = Vec::new();
	let mut inside = false;
	let mut previous: Option<GeomOp> = None;

	for op in ops {
		match op.command {
			GeomCommand::MoveTo => {
				inside = rect.contains(op.x, op.y);
				if inside {
					result.push(*op);
				}
				previous = Some(*op);
			}
			GeomCommand::LineTo => {
				let now_inside = rect.contains(op.x, op.y);
				match (inside, now_inside) {
					(true, true) => result.push(*op),
					(false, true) => {
						let entry = previous.and_then(|prev| {
							clip_parameters(&prev, op, rect).map(|(t0, _)| point_at(&prev, op, t0, rect))
						});
						match entry {
							Some((x, y)) if (x, y) != (op.x, op.y) => {
								result.push(GeomOp::phantom(GeomCommand::MoveTo, x, y, 0));
								result.push(*op);
							}
							_ => result.push(GeomOp {
								command: GeomCommand::MoveTo,
								..*op
							}),
						}
					}
					(true, false) => {
						let (x, y) = previous
							.and_then(|prev| {
								clip_parameters(&prev, op, rect).map(|(_, t1)| point_at(&prev, op, t1, rect))
							})
							.unwrap_or_else(|| previous.map_or((op.x, op.y), |prev| (prev.x, prev.y)));
						result.push(GeomOp::phantom(GeomCommand::LineTo, x, y, 0));
					}
					(false, false) => {}
				}
				inside = now_inside;
				previous = Some(*op);
			}
			GeomCommand::ClosePath => {
				if inside {
					result.push(*op);
				}
			}
		}
	}

	remove_degenerate_move_tos(result)
}

/// Drops every MoveTo that is followed by another MoveTo or by nothing.
fn remove_degenerate_move_tos(ops: Vec<GeomOp>) -> Result<Vec<GeomOp>> {
	let mut result = Vec::with_capacity(ops.len());
	for (i, op) in ops.iter().enumerate() {
		let degenerate = op.is_move_to() && ops.get(i + 1).is_none_or(GeomOp::is_move_to);
		if degenerate {
			if op.point_id != 0 {
				bail!(
					"dropping an isolated MoveTo at ({}, {}) would lose point id {}",
					op.x,
					op.y,
					op.point_id
				);
			}
		} else {
			result.push(*op);
		}
	}
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn rect() -> BBox {
		BBox::new(0, 0, 100, 100)
	}

	fn with_id(mut op: GeomOp, point_id: u64) -> GeomOp {
		op.point_id = point_id;
		op
	}

	#[test]
	fn inside_path_is_unchanged() -> Result<()> {
		let ops = vec![
			GeomOp::move_to(10, 10),
			GeomOp::line_to(90, 10),
			GeomOp::line_to(100, 100),
		];
		assert_eq!(clip_to_rect(&ops, &rect())?, ops);
		Ok(())
	}

	#[test]
	fn leaving_emits_phantom_exit() -> Result<()> {
		let ops = vec![GeomOp::move_to(50, 50), GeomOp::line_to(150, 50)];
		assert_eq!(
			clip_to_rect(&ops, &rect())?,
			vec![
				GeomOp::move_to(50, 50),
				GeomOp::phantom(GeomCommand::LineTo, 100, 50, 0)
			]
		);
		Ok(())
	}

	#[test]
	fn entering_emits_phantom_move_to() -> Result<()> {
		let ops = vec![GeomOp::move_to(-50, 20), GeomOp::line_to(50, 70)];
		assert_eq!(
			clip_to_rect(&ops, &rect())?,
			vec![
				GeomOp::phantom(GeomCommand::MoveTo, 0, 45, 0),
				GeomOp::line_to(50, 70)
			]
		);
		Ok(())
	}

	#[test]
	fn entering_exactly_at_a_vertex() -> Result<()> {
		let ops = vec![GeomOp::move_to(-50, 0), GeomOp::line_to(0, 0), GeomOp::line_to(50, 50)];
		assert_eq!(
			clip_to_rect(&ops, &rect())?,
			vec![GeomOp::move_to(0, 0), GeomOp::line_to(50, 50)]
		);
		Ok(())
	}

	#[test]
	fn leave_and_reenter() -> Result<()> {
		let ops = vec![
			GeomOp::move_to(10, 50),
			GeomOp::line_to(200, 50),
			GeomOp::line_to(200, 80),
			GeomOp::line_to(50, 80),
		];
		assert_eq!(
			clip_to_rect(&ops, &rect())?,
			vec![
				GeomOp::move_to(10, 50),
				GeomOp::phantom(GeomCommand::LineTo, 100, 50, 0),
				GeomOp::phantom(GeomCommand::MoveTo, 100, 80, 0),
				GeomOp::line_to(50, 80),
			]
		);
		Ok(())
	}

	#[test]
	fn segment_crossing_the_whole_cell_is_dropped() -> Result<()> {
		let ops = vec![GeomOp::move_to(-50, 50), GeomOp::line_to(150, 50)];
		assert!(clip_to_rect(&ops, &rect())?.is_empty());
		Ok(())
	}

	#[test]
	fn keeps_point_ids_of_real_vertices() -> Result<()> {
		let ops = vec![
			GeomOp::move_to(-40, 10),
			with_id(GeomOp::line_to(0, 10), 4),
			GeomOp::line_to(60, 10),
		];
		let clipped = clip_to_rect(&ops, &rect())?;
		assert_eq!(clipped[0].point_id, 4);
		assert!(clipped[0].is_move_to());
		Ok(())
	}

	#[test]
	fn close_path_only_when_inside() -> Result<()> {
		let ops = vec![
			GeomOp::move_to(10, 10),
			GeomOp::line_to(20, 10),
			GeomOp::close_path(),
			GeomOp::move_to(500, 500),
			GeomOp::line_to(600, 500),
			GeomOp::close_path(),
		];
		assert_eq!(clip_to_rect(&ops, &rect())?, ops[0..3].to_vec());
		Ok(())
	}

	#[test]
	fn drops_isolated_move_tos() -> Result<()> {
		let ops = vec![
			GeomOp::move_to(10, 10),
			GeomOp::move_to(20, 20),
			GeomOp::line_to(30, 30),
			GeomOp::move_to(40, 40),
		];
		assert_eq!(
			clip_to_rect(&ops, &rect())?,
			vec![GeomOp::move_to(20, 20), GeomOp::line_to(30, 30)]
		);
		Ok(())
	}

	#[test]
	fn isolated_move_to_with_point_id_fails() {
		let ops = vec![with_id(GeomOp::move_to(10, 10), 7), GeomOp::move_to(20, 20)];
		assert!(clip_to_rect(&ops, &rect()).is_err());
	}
}
