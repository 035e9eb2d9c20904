//! Plain 2D primitives in layout space.

/// A position in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Build a point from its coordinates.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A straight segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
	/// First endpoint.
	pub start: Point,
	/// Second endpoint.
	pub end: Point,
}

impl Segment {
	/// Build a segment from its endpoints.
	pub const fn new(start: Point, end: Point) -> Self {
		Self { start, end }
	}

	/// Axis-aligned bounding box of the segment.
	pub fn bounds(&self) -> Viewport {
		Viewport {
			left: self.start.x.min(self.end.x),
			right: self.start.x.max(self.end.x),
			top: self.start.y.min(self.end.y),
			bottom: self.start.y.max(self.end.y),
		}
	}

	/// Segment/segment intersection using the determinant parametrization.
	///
	/// Parallel (and collinear) segments are reported as not intersecting.
	pub fn intersects(&self, other: &Segment) -> bool {
		let (x1, y1, x2, y2) = (self.start.x, self.start.y, self.end.x, self.end.y);
		let (x3, y3, x4, y4) = (other.start.x, other.start.y, other.end.x, other.end.y);

		let denominator = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
		if denominator == 0.0 {
			return false;
		}

		let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denominator;
		let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denominator;

		(0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
	}
}

/// An axis-aligned rectangle in layout space. `top < bottom` (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	/// Smallest x.
	pub left: f64,
	/// Smallest y.
	pub top: f64,
	/// Largest x.
	pub right: f64,
	/// Largest y.
	pub bottom: f64,
}

impl Viewport {
	/// Build a rectangle from its four edges.
	pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
		Self {
			left,
			top,
			right,
			bottom,
		}
	}

	/// Rectangle of `width` x `height` anchored at `(left, top)`.
	pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self::new(left, top, left + width, top + height)
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.right - self.left
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.bottom - self.top
	}

	/// Grow the rectangle by `margin` on all four sides.
	pub fn expand(&self, margin: f64) -> Self {
		Self::new(
			self.left - margin,
			self.top - margin,
			self.right + margin,
			self.bottom + margin,
		)
	}

	/// Inclusive point containment.
	pub fn contains(&self, point: Point) -> bool {
		point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
	}

	/// Whether two rectangles overlap (touching edges count).
	pub fn overlaps(&self, other: &Viewport) -> bool {
		!(other.right < self.left
			|| other.left > self.right
			|| other.bottom < self.top
			|| other.top > self.bottom)
	}

	/// The four boundary edges in clockwise order starting at the top edge.
	pub fn edges(&self) -> [Segment; 4] {
		let top_left = Point::new(self.left, self.top);
		let top_right = Point::new(self.right, self.top);
		let bottom_right = Point::new(self.right, self.bottom);
		let bottom_left = Point::new(self.left, self.bottom);
		[
			Segment::new(top_left, top_right),
			Segment::new(top_right, bottom_right),
			Segment::new(bottom_right, bottom_left),
			Segment::new(bottom_left, top_left),
		]
	}

	/// A segment is inside when either endpoint is contained or it crosses an edge.
	pub fn intersects_segment(&self, segment: &Segment) -> bool {
		if self.contains(segment.start) || self.contains(segment.end) {
			return true;
		}
		self.edges().iter().any(|edge| segment.intersects(edge))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn crossing_segments_intersect() {
		let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
		let b = Segment::new(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
		assert!(a.intersects(&b));
	}

	#[test]
	fn parallel_segments_do_not_intersect() {
		let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
		let b = Segment::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0));
		assert!(!a.intersects(&b));

		let collinear = Segment::new(Point::new(5.0, 0.0), Point::new(15.0, 0.0));
		assert!(!a.intersects(&collinear));
	}

	#[test]
	fn disjoint_segments_do_not_intersect() {
		let a = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
		let b = Segment::new(Point::new(5.0, 0.0), Point::new(6.0, -3.0));
		assert!(!a.intersects(&b));
	}

	#[test]
	fn segment_through_viewport_without_endpoints_inside() {
		let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0);
		let through = Segment::new(Point::new(-10.0, 50.0), Point::new(110.0, 50.0));
		assert!(viewport.intersects_segment(&through));

		let beside = Segment::new(Point::new(-10.0, 150.0), Point::new(110.0, 150.0));
		assert!(!viewport.intersects_segment(&beside));
	}

	#[test]
	fn containment_is_inclusive() {
		let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0);
		assert!(viewport.contains(Point::new(0.0, 100.0)));
		assert!(!viewport.contains(Point::new(100.1, 50.0)));
		assert_eq!(viewport.expand(10.0), Viewport::new(-10.0, -10.0, 110.0, 110.0));
	}
}
