//! Transforms between layout space, the minimap and the screen.

use super::geometry::{Point, Viewport};

/// Scroll offset and zoom of the main canvas.
///
/// `screen = layout * zoom - scroll`, with `scroll` in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal scroll offset in screen pixels.
	pub scroll_left: f64,
	/// Vertical scroll offset in screen pixels; negative when the content
	/// extends above the origin.
	pub scroll_top: f64,
	/// Layout → screen scale factor.
	pub zoom: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			scroll_left: 0.0,
			scroll_top: 0.0,
			zoom: 1.0,
		}
	}
}

impl ViewTransform {
	/// Layout position → canvas pixel, e.g. to anchor a tooltip.
	pub fn layout_to_screen(&self, point: Point) -> Point {
		Point::new(
			point.x * self.zoom - self.scroll_left,
			point.y * self.zoom - self.scroll_top,
		)
	}

	/// Canvas pixel → layout position, e.g. for hit testing the pointer.
	pub fn screen_to_layout(&self, point: Point) -> Point {
		Point::new(
			(point.x + self.scroll_left) / self.zoom,
			(point.y + self.scroll_top) / self.zoom,
		)
	}

	/// Zoom by `factor` keeping the layout point under `anchor` fixed on screen.
	pub fn zoom_around(&mut self, anchor: Point, factor: f64, min_zoom: f64, max_zoom: f64) {
		let focus = self.screen_to_layout(anchor);
		self.zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
		self.scroll_left = focus.x * self.zoom - anchor.x;
		self.scroll_top = focus.y * self.zoom - anchor.y;
	}

	/// Keep the scroll offset inside `[start, end - viewport]` of `content` on
	/// both axes. Content smaller than the viewport pins the scroll to its start.
	pub fn clamp_scroll(&mut self, content: &Viewport, viewport_width: f64, viewport_height: f64) {
		let (min_left, min_top) = (content.left * self.zoom, content.top * self.zoom);
		let max_left = (content.right * self.zoom - viewport_width).max(min_left);
		let max_top = (content.bottom * self.zoom - viewport_height).max(min_top);
		self.scroll_left = self.scroll_left.clamp(min_left, max_left);
		self.scroll_top = self.scroll_top.clamp(min_top, max_top);
	}
}

/// Minimap scaling derived on every container resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapScale {
	/// Horizontal layout→minimap factor.
	pub scale: f64,
	/// Extra vertical compression on top of `scale`.
	pub vertical_scale: f64,
	/// Layout point drawn at the minimap's top-left corner.
	pub origin: Point,
}

impl MinimapScale {
	/// `min(available / total, vertical_scale)`, so content never overflows.
	///
	/// An empty layout falls back to `vertical_scale`.
	pub fn fit(available_width: f64, total_layout_width: f64, vertical_scale: f64) -> Self {
		let horizontal = if total_layout_width > 0.0 && available_width.is_finite() {
			available_width / total_layout_width
		} else {
			vertical_scale
		};
		Self {
			scale: horizontal.min(vertical_scale),
			vertical_scale,
			origin: Point::default(),
		}
	}

	/// Same scale, drawn from `origin` instead of the layout origin.
	pub fn with_origin(self, origin: Point) -> Self {
		Self { origin, ..self }
	}

	/// Layout position → minimap position.
	pub fn layout_to_minimap(&self, point: Point) -> Point {
		let relative = Point::new(point.x - self.origin.x, point.y - self.origin.y);
		layout_to_minimap(relative, self.scale, self.vertical_scale)
	}

	/// Minimap pointer → top-left scroll target centring the pointer, never
	/// before `origin`.
	pub fn minimap_to_layout(&self, pointer: Point, viewport_size: Point) -> Point {
		let relative = minimap_to_layout(pointer, self.scale, self.vertical_scale, viewport_size);
		Point::new(relative.x + self.origin.x, relative.y + self.origin.y)
	}

	/// Outline of the visible area, in minimap coordinates.
	pub fn viewport_indicator(&self, visible: &Viewport) -> Viewport {
		let top_left = self.layout_to_minimap(Point::new(visible.left, visible.top));
		let bottom_right = self.layout_to_minimap(Point::new(visible.right, visible.bottom));
		Viewport::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
	}
}

/// `(x * scale, y * scale * vertical_scale)`.
pub fn layout_to_minimap(point: Point, scale: f64, vertical_scale: f64) -> Point {
	Point::new(point.x * scale, point.y * scale * vertical_scale)
}

/// Inverse of [`layout_to_minimap`], shifted so the pointer lands in the middle
/// of a `viewport_size` viewport, and clamped to non-negative coordinates.
pub fn minimap_to_layout(
	pointer: Point,
	scale: f64,
	vertical_scale: f64,
	viewport_size: Point,
) -> Point {
	let x = pointer.x / scale - viewport_size.x / 2.0;
	let y = pointer.y / (scale * vertical_scale) - viewport_size.y / 2.0;
	Point::new(x.max(0.0), y.max(0.0))
}

/// Pointer-driven dragging of the minimap viewport indicator.
///
/// Pure state: the DOM side feeds pointer positions in and applies the scroll
/// targets that come out.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MinimapDrag {
	active: bool,
}

impl MinimapDrag {
	/// Start following the pointer.
	pub fn begin(&mut self) {
		self.active = true;
	}

	/// Whether a drag is in progress.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Scroll target for a pointer move, or `None` once the drag has ended.
	pub fn update(&self, pointer: Point, scale: &MinimapScale, viewport_size: Point) -> Option<Point> {
		self.active
			.then(|| scale.minimap_to_layout(pointer, viewport_size))
	}

	/// Stop following the pointer.
	pub fn end(&mut self) {
		self.active = false;
	}
}

/// Years labelled on the minimap ruler.
pub const KEY_YEARS: [i32; 13] = [
	-100000, -10000, -1000, 0, 500, 1000, 1500, 1750, 1800, 1850, 1900, 1950, 2000,
];

/// Ruler labels: `(minimap x, text)` for every key year, skipping 1000 on small
/// screens. Each label sits at the x of the node whose year is closest.
pub fn key_year_labels(
	nodes: &[(i32, f64)],
	scale: f64,
	small_screen: bool,
) -> Vec<(f64, String)> {
	if nodes.is_empty() {
		return Vec::new();
	}
	KEY_YEARS
		.iter()
		.filter(|&&year| !(small_screen && year == 1000))
		.filter_map(|&year| {
			let (_, x) = nodes
				.iter()
				.min_by_key(|(node_year, _)| (i64::from(*node_year) - i64::from(year)).abs())?;
			Some((x * scale, format_year(year, small_screen)))
		})
		.collect()
}

/// `"500"`, `"1000 BCE"` (or `"-1000"` on small screens); year 0 reads `"1"`.
pub fn format_year(year: i32, small_screen: bool) -> String {
	match year {
		0 => "1".to_owned(),
		year if year < 0 && small_screen => format!("-{}", year.unsigned_abs()),
		year if year < 0 => format!("{} BCE", year.unsigned_abs()),
		year => year.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn screen_round_trip() {
		let transform = ViewTransform {
			scroll_left: 300.0,
			scroll_top: 40.0,
			zoom: 1.5,
		};
		let layout = Point::new(420.0, 610.0);
		let screen = transform.layout_to_screen(layout);
		assert_eq!(screen, Point::new(330.0, 875.0));
		assert_eq!(transform.screen_to_layout(screen), layout);
	}

	#[test]
	fn zooming_keeps_the_anchor_fixed() {
		let mut transform = ViewTransform::default();
		let anchor = Point::new(200.0, 100.0);
		let before = transform.screen_to_layout(anchor);
		transform.zoom_around(anchor, 2.0, 0.1, 4.0);
		let after = transform.screen_to_layout(anchor);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
		assert_eq!(transform.zoom, 2.0);
	}

	#[test]
	fn scroll_is_clamped_to_content() {
		let mut transform = ViewTransform {
			scroll_left: -50.0,
			scroll_top: 9000.0,
			zoom: 1.0,
		};
		transform.clamp_scroll(&Viewport::new(0.0, 0.0, 2000.0, 1000.0), 800.0, 600.0);
		assert_eq!(transform.scroll_left, 0.0);
		assert_eq!(transform.scroll_top, 400.0);
	}

	#[test]
	fn content_above_the_origin_is_reachable() {
		let mut transform = ViewTransform {
			scroll_left: 0.0,
			scroll_top: -5000.0,
			zoom: 2.0,
		};
		let content = Viewport::new(0.0, -400.0, 2000.0, 1600.0);
		transform.clamp_scroll(&content, 800.0, 600.0);
		assert_eq!(transform.scroll_top, -800.0);
		assert_eq!(transform.layout_to_screen(Point::new(0.0, -400.0)).y, 0.0);

		transform.scroll_top = 9000.0;
		transform.clamp_scroll(&content, 800.0, 600.0);
		assert_eq!(transform.scroll_top, 3200.0 - 600.0);
	}

	#[test]
	fn fit_takes_the_tighter_axis() {
		let wide = MinimapScale::fit(1000.0, 250_000.0, 1.0);
		assert_eq!(wide.scale, 0.004);

		let tiny_layout = MinimapScale::fit(1000.0, 100.0, 2.0);
		assert_eq!(tiny_layout.scale, 2.0);

		let empty = MinimapScale::fit(1000.0, 0.0, 1.0);
		assert_eq!(empty.scale, 1.0);
	}

	#[test]
	fn click_centres_viewport_and_clamps_at_origin() {
		let scale = MinimapScale::fit(250.0, 1000.0, 2.0);
		let target = scale.minimap_to_layout(Point::new(150.0, 40.0), Point::new(800.0, 600.0));
		assert_eq!(target, Point::new(200.0, 0.0));
	}

	#[test]
	fn drag_only_emits_while_active() {
		let scale = MinimapScale::fit(500.0, 1000.0, 1.0);
		let size = Point::new(100.0, 100.0);
		let mut drag = MinimapDrag::default();
		assert_eq!(drag.update(Point::new(100.0, 100.0), &scale, size), None);

		drag.begin();
		assert_eq!(
			drag.update(Point::new(100.0, 100.0), &scale, size),
			Some(Point::new(150.0, 150.0))
		);

		drag.end();
		assert!(!drag.is_active());
		assert_eq!(drag.update(Point::new(10.0, 10.0), &scale, size), None);
	}

	#[test]
	fn indicator_tracks_the_visible_area() {
		let scale = MinimapScale::fit(250.0, 1000.0, 2.0);
		let indicator = scale.viewport_indicator(&Viewport::new(100.0, 50.0, 900.0, 650.0));
		assert_eq!(indicator, Viewport::new(25.0, 25.0, 225.0, 325.0));
	}

	#[test]
	fn shifted_origin_maps_content_top_to_the_minimap_top() {
		let scale = MinimapScale::fit(250.0, 1000.0, 2.0).with_origin(Point::new(0.0, -400.0));
		assert_eq!(scale.layout_to_minimap(Point::new(100.0, -400.0)), Point::new(25.0, 0.0));

		let target = scale.minimap_to_layout(Point::new(150.0, 0.0), Point::new(800.0, 600.0));
		assert_eq!(target, Point::new(200.0, -400.0));
	}

	#[test]
	fn years_are_formatted_for_the_ruler() {
		assert_eq!(format_year(0, false), "1");
		assert_eq!(format_year(-10000, false), "10000 BCE");
		assert_eq!(format_year(-10000, true), "-10000");
		assert_eq!(format_year(1850, true), "1850");
	}

	#[test]
	fn key_years_snap_to_nearest_node() {
		let nodes = [(-3000, 120.0), (900, 260.0), (1990, 400.0)];
		let labels = key_year_labels(&nodes, 0.5, false);
		assert_eq!(labels.len(), KEY_YEARS.len());
		assert_eq!(labels[0], (60.0, "100000 BCE".to_owned()));
		assert_eq!(labels[5], (130.0, "1000".to_owned()));
		assert_eq!(labels[12], (200.0, "2000".to_owned()));

		let small = key_year_labels(&nodes, 0.5, true);
		assert_eq!(small.len(), KEY_YEARS.len() - 1);
		assert!(key_year_labels(&[], 1.0, false).is_empty());
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(100))]

		#[test]
		fn prop_minimap_inverse_recovers_centred_point(
			x in 0.0f64..100_000.0,
			y in 0.0f64..5_000.0,
			scale in 0.001f64..2.0,
			vertical_scale in prop::sample::select(vec![1.0f64, 2.0]),
			width in 1.0f64..3000.0,
			height in 1.0f64..3000.0,
		) {
			let p = Point::new(x, y);
			let size = Point::new(width, height);
			let mini = layout_to_minimap(p, scale, vertical_scale);
			let back = minimap_to_layout(mini, scale, vertical_scale, size);

			let expected_x = (x - width / 2.0).max(0.0);
			let expected_y = (y - height / 2.0).max(0.0);
			prop_assert!((back.x - expected_x).abs() < 1e-6 * x.max(1.0));
			prop_assert!((back.y - expected_y).abs() < 1e-6 * y.max(1.0));
		}
	}
}
