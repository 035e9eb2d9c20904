//! Cubic Bézier geometry of a drawn connection.
//!
//! The index only knows the straight chord; this is the curve the canvas
//! actually strokes, used for drawing and for spotting chords that hit the
//! viewport while the curve itself stays outside.

use super::geometry::{Point, Segment, Viewport};

/// Horizontal reach of the control points, capped at this distance.
const MAX_CONTROL_OFFSET: f64 = 200.0;

/// Endpoints closer than this horizontally are drawn as an S-curve.
const SAME_COLUMN_THRESHOLD: f64 = 160.0;

/// Vertical nudge of the S-curve control points.
const S_CURVE_LIFT: f64 = 50.0;

const SAMPLES: usize = 24;

/// Farthest a curve strays horizontally from its chord's bounding box.
pub const MAX_BULGE: f64 = MAX_CONTROL_OFFSET;

/// A source→target cubic curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionCurve {
	/// Source node position.
	pub start: Point,
	/// Control point leaving the source.
	pub control1: Point,
	/// Control point entering the target.
	pub control2: Point,
	/// Target node position, where the arrowhead sits.
	pub end: Point,
}

impl ConnectionCurve {
	/// Build the curve the renderer draws between two node positions.
	pub fn between(start: Point, end: Point) -> Self {
		let delta_x = (end.x - start.x).abs();
		let (control1, control2) = if delta_x < SAME_COLUMN_THRESHOLD {
			let lift = (start.y - end.y).signum();
			(
				Point::new(start.x + MAX_CONTROL_OFFSET, start.y - lift * S_CURVE_LIFT),
				Point::new(end.x - MAX_CONTROL_OFFSET, end.y + lift * S_CURVE_LIFT),
			)
		} else {
			let offset = (delta_x * 0.5).min(MAX_CONTROL_OFFSET);
			(
				Point::new(start.x + offset, start.y),
				Point::new(end.x - offset, end.y),
			)
		};
		Self {
			start,
			control1,
			control2,
			end,
		}
	}

	/// Point on the curve at parameter `t` in `[0, 1]`.
	pub fn point_at(&self, t: f64) -> Point {
		let u = 1.0 - t;
		let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
		Point::new(
			a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
			a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
		)
	}

	/// Hull of the four defining points; always contains the curve.
	pub fn bounding_box(&self) -> Viewport {
		let points = [self.start, self.control1, self.control2, self.end];
		let mut bounds = Viewport::new(
			f64::INFINITY,
			f64::INFINITY,
			f64::NEG_INFINITY,
			f64::NEG_INFINITY,
		);
		for point in points {
			bounds.left = bounds.left.min(point.x);
			bounds.right = bounds.right.max(point.x);
			bounds.top = bounds.top.min(point.y);
			bounds.bottom = bounds.bottom.max(point.y);
		}
		bounds
	}

	/// Whether the sampled curve touches `viewport`.
	pub fn crosses(&self, viewport: &Viewport) -> bool {
		if !self.bounding_box().overlaps(viewport) {
			return false;
		}
		let mut previous = self.start;
		(1..=SAMPLES).any(|step| {
			let next = self.point_at(step as f64 / SAMPLES as f64);
			let hit = viewport.intersects_segment(&Segment::new(previous, next));
			previous = next;
			hit
		})
	}

	/// Direction of travel at the target end, used to orient the arrowhead.
	pub fn end_angle(&self) -> f64 {
		let (dx, dy) = (self.end.x - self.control2.x, self.end.y - self.control2.y);
		if dx == 0.0 && dy == 0.0 {
			let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
			return dy.atan2(dx);
		}
		dy.atan2(dx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoints_are_on_the_curve() {
		let curve = ConnectionCurve::between(Point::new(0.0, 0.0), Point::new(600.0, 300.0));
		assert_eq!(curve.point_at(0.0), curve.start);
		let end = curve.point_at(1.0);
		assert!((end.x - 600.0).abs() < 1e-9 && (end.y - 300.0).abs() < 1e-9);
	}

	#[test]
	fn distant_columns_use_capped_horizontal_controls() {
		let curve = ConnectionCurve::between(Point::new(0.0, 0.0), Point::new(1000.0, 100.0));
		assert_eq!(curve.control1, Point::new(200.0, 0.0));
		assert_eq!(curve.control2, Point::new(800.0, 100.0));

		let near = ConnectionCurve::between(Point::new(0.0, 0.0), Point::new(300.0, 100.0));
		assert_eq!(near.control1, Point::new(150.0, 0.0));
	}

	#[test]
	fn same_column_bows_sideways() {
		let curve = ConnectionCurve::between(Point::new(100.0, 0.0), Point::new(100.0, 400.0));
		let bounds = curve.bounding_box();
		assert!(bounds.right >= 300.0);
		assert!(bounds.left <= -100.0);
	}

	#[test]
	fn chord_hit_with_curve_miss_is_detected() {
		// The chord runs straight through the box, the S-curve swings to the
		// right of it at that height.
		let curve = ConnectionCurve::between(Point::new(100.0, 0.0), Point::new(100.0, 400.0));
		let chord = Segment::new(curve.start, curve.end);
		let viewport = Viewport::new(95.0, 95.0, 105.0, 105.0);
		assert!(viewport.intersects_segment(&chord));
		assert!(!curve.crosses(&viewport));
	}

	#[test]
	fn curve_through_viewport_is_detected() {
		let curve = ConnectionCurve::between(Point::new(0.0, 50.0), Point::new(1000.0, 50.0));
		assert!(curve.crosses(&Viewport::new(400.0, 0.0, 600.0, 100.0)));
		assert!(!curve.crosses(&Viewport::new(400.0, 200.0, 600.0, 300.0)));
	}
}
