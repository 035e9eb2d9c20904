use std::collections::HashSet;

use log::debug;

use crate::config::TreeConfig;
use crate::data::{GraphData, NodeFilter, SearchKind, SearchResult};
use crate::engine::coords::key_year_labels;
use crate::engine::{
	MinimapDrag, MinimapScale, Point, Selection, TechTreeSession, ViewTransform, ViewportInput,
	VisibleElements,
};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.2;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;

/// Pointer travel, in pixels, below which a press and release is a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

/// A selected node is scrolled this far above the vertical centre.
const SELECTION_LIFT: f64 = 150.0;

#[derive(Clone, Debug, Default)]
/// A drag of the main canvas in progress.
pub struct PanState {
	/// A press is held.
	pub active: bool,
	/// Press position, canvas pixels.
	pub start_x: f64,
	/// Press position, canvas pixels.
	pub start_y: f64,
	/// Scroll at the time of the press.
	pub scroll_start_left: f64,
	/// Scroll at the time of the press.
	pub scroll_start_top: f64,
}

#[derive(Clone, Debug, Default)]
/// The node under the pointer and its direct neighbours.
pub struct HoverState {
	/// Hovered node id.
	pub node: Option<String>,
	/// Ids linked to the hovered node.
	pub neighbours: HashSet<String>,
}

/// Everything the canvas component needs between frames.
pub struct TechTreeState {
	/// Loaded data, index and visibility controller.
	pub session: TechTreeSession,
	/// Tunables.
	pub config: TreeConfig,
	/// Scroll and zoom.
	pub transform: ViewTransform,
	/// Main canvas drag.
	pub pan: PanState,
	/// Hover highlight.
	pub hover: HoverState,
	/// Clicked node or connection.
	pub selection: Selection,
	/// Minimap pointer state.
	pub minimap_drag: MinimapDrag,
	/// Layout to minimap mapping.
	pub minimap: MinimapScale,
	/// Minimap year labels as `(x, text)`.
	pub year_labels: Vec<(f64, String)>,
	/// Result of the last visibility pass.
	pub visible: VisibleElements,
	/// Main canvas width in pixels.
	pub width: f64,
	/// Main canvas height in pixels.
	pub height: f64,
	dirty: bool,
}

impl TechTreeState {
	/// Lay out `data`, dim by `filter` and fit the minimap.
	pub fn new(
		data: &GraphData,
		filter: &NodeFilter,
		config: TreeConfig,
		width: f64,
		height: f64,
	) -> Self {
		let mut session = TechTreeSession::new(config.layout, config.visibility);
		session.set_filter(filter);
		let minimap = MinimapScale::fit(width, 0.0, config.minimap.vertical_scale(width));
		let mut state = Self {
			session,
			config,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selection: Selection::None,
			minimap_drag: MinimapDrag::default(),
			minimap,
			year_labels: Vec::new(),
			visible: VisibleElements::default(),
			width,
			height,
			dirty: true,
		};
		state.reload(data);
		state
	}

	/// Swap in a new data set, keeping the scroll position where possible.
	/// The selection refers to the old data and is dropped.
	pub fn reload(&mut self, data: &GraphData) {
		self.session.load(data);
		self.hover = HoverState::default();
		self.selection = Selection::None;
		self.refit_minimap();
		self.clamp_scroll();
		self.dirty = true;
	}

	/// Dim the nodes `filter` rejects; nothing moves.
	pub fn set_filter(&mut self, filter: &NodeFilter) {
		self.session.set_filter(filter);
	}

	/// Track a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.refit_minimap();
		self.clamp_scroll();
		self.dirty = true;
	}

	fn refit_minimap(&mut self) {
		let minimap_config = &self.config.minimap;
		let bounds = self.session.bounds();
		self.minimap = MinimapScale::fit(
			self.width,
			bounds.right,
			minimap_config.vertical_scale(self.width),
		)
		.with_origin(Point::new(bounds.left, bounds.top));
		let years: Vec<(i32, f64)> = self
			.session
			.nodes()
			.iter()
			.map(|positioned| (positioned.node.year, positioned.position.x))
			.collect();
		self.year_labels = key_year_labels(
			&years,
			self.minimap.scale,
			minimap_config.is_small_screen(self.width),
		);
	}

	fn clamp_scroll(&mut self) {
		let bounds = self.session.bounds();
		self.transform.clamp_scroll(&bounds, self.width, self.height);
	}

	/// Current scroll, size and zoom for a visibility pass.
	pub fn viewport_input(&self) -> ViewportInput {
		ViewportInput {
			scroll_left: self.transform.scroll_left,
			scroll_top: self.transform.scroll_top,
			viewport_width: self.width,
			viewport_height: self.height,
			zoom: self.transform.zoom,
		}
	}

	/// Recompute the visible sets if anything moved since the last frame.
	pub fn refresh_visibility(&mut self) {
		if !self.dirty {
			return;
		}
		let input = self.viewport_input();
		self.visible = self.session.visible(&input);
		self.dirty = false;
	}

	/// Scroll so that layout point `target` is the top-left corner.
	pub fn scroll_to_layout(&mut self, target: Point) {
		self.transform.scroll_left = target.x * self.transform.zoom;
		self.transform.scroll_top = target.y * self.transform.zoom;
		self.clamp_scroll();
		self.dirty = true;
	}

	/// Scroll by a pixel delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.transform.scroll_left += dx;
		self.transform.scroll_top += dy;
		self.clamp_scroll();
		self.dirty = true;
	}

	/// Press on the main canvas.
	pub fn start_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			scroll_start_left: self.transform.scroll_left,
			scroll_start_top: self.transform.scroll_top,
		};
	}

	/// Follow the pointer while pressed.
	pub fn pan_to_screen(&mut self, x: f64, y: f64) {
		self.transform.scroll_left = self.pan.scroll_start_left - (x - self.pan.start_x);
		self.transform.scroll_top = self.pan.scroll_start_top - (y - self.pan.start_y);
		self.clamp_scroll();
		self.dirty = true;
	}

	/// Release the pointer; a release close to the press point is a click.
	pub fn finish_pan(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		self.pan.active = false;
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if dx.hypot(dy) < CLICK_TOLERANCE {
			self.click_at(x, y);
		}
	}

	/// Zoom by `factor` keeping the pixel `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		self.transform
			.zoom_around(Point::new(x, y), factor, MIN_ZOOM, MAX_ZOOM);
		self.clamp_scroll();
		self.dirty = true;
	}

	/// Update the hover highlight for a canvas pixel.
	pub fn set_hover_at(&mut self, x: f64, y: f64) {
		let layout = self.transform.screen_to_layout(Point::new(x, y));
		let hovered = self.session.node_at(layout).map(|positioned| positioned.node.id.clone());
		if hovered == self.hover.node {
			return;
		}
		self.hover.neighbours = hovered
			.as_deref()
			.map(|id| {
				self.session
					.neighbours(id)
					.into_iter()
					.map(str::to_owned)
					.collect()
			})
			.unwrap_or_default();
		self.hover.node = hovered;
	}

	/// Pointer left the canvas.
	pub fn clear_hover(&mut self) {
		self.hover = HoverState::default();
	}

	/// Whether `id` is hovered or next to the hovered node.
	pub fn is_highlighted(&self, id: &str) -> bool {
		self.hover.node.as_deref() == Some(id) || self.hover.neighbours.contains(id)
	}

	/// Select whatever sits under a canvas pixel, or clear the selection.
	pub fn click_at(&mut self, x: f64, y: f64) {
		let layout = self.transform.screen_to_layout(Point::new(x, y));
		if let Some(id) = self.session.node_at(layout).map(|p| p.node.id.clone()) {
			self.select_node(&id);
		} else if let Some(connection) = self.session.connection_at(layout) {
			self.select_link(connection);
		} else {
			self.clear_selection();
		}
	}

	/// Toggle the selection of `id`; a new selection is scrolled into view.
	pub fn select_node(&mut self, id: &str) {
		if self.selection.node_id() == Some(id) {
			self.clear_selection();
		} else {
			self.scroll_to_node(id);
		}
	}

	/// Select `id` and centre it horizontally, slightly above the middle.
	pub fn scroll_to_node(&mut self, id: &str) {
		let Some(position) = self.session.node(id).map(|p| p.position) else {
			return;
		};
		debug!("Selecting {id}");
		self.set_selection(Selection::node(id));
		let zoom = self.transform.zoom;
		self.transform.scroll_left = position.x * zoom - self.width / 2.0;
		self.transform.scroll_top = position.y * zoom - self.height / 2.0 + SELECTION_LIFT;
		self.clamp_scroll();
	}

	/// Centre the column closest to `year` horizontally.
	pub fn scroll_to_year(&mut self, year: i32) {
		let Some(x) = self.session.year_x(year) else {
			return;
		};
		self.transform.scroll_left = x * self.transform.zoom - self.width / 2.0;
		self.clamp_scroll();
		self.dirty = true;
	}

	/// Toggle the selection of a connection.
	pub fn select_link(&mut self, connection: usize) {
		if self.selection.link() == Some(connection) {
			self.clear_selection();
		} else {
			self.set_selection(Selection::Link(connection));
		}
	}

	/// Drop the selection and its pins.
	pub fn clear_selection(&mut self) {
		self.set_selection(Selection::None);
	}

	/// Toggle the ancestor chain of the selected node.
	pub fn toggle_ancestors(&mut self) {
		let Selection::Node { id, ancestors, .. } = &mut self.selection else {
			return;
		};
		*ancestors = if ancestors.is_empty() {
			self.session.ancestors(id)
		} else {
			HashSet::new()
		};
		self.repin();
	}

	/// Toggle the descendant chain of the selected node.
	pub fn toggle_descendants(&mut self) {
		let Selection::Node { id, descendants, .. } = &mut self.selection else {
			return;
		};
		*descendants = if descendants.is_empty() {
			self.session.descendants(id)
		} else {
			HashSet::new()
		};
		self.repin();
	}

	fn set_selection(&mut self, selection: Selection) {
		self.selection = selection;
		self.repin();
	}

	fn repin(&mut self) {
		self.session.pin(&self.selection);
		self.dirty = true;
	}

	/// Jump to the best match for `query`, if any, and return it.
	pub fn apply_search(&mut self, query: &str) -> Option<SearchResult> {
		let best = self.session.search(query).into_iter().next()?;
		match (best.kind, best.node_id.as_deref()) {
			(SearchKind::Year, _) | (_, None) => self.scroll_to_year(best.year),
			(_, Some(id)) => self.scroll_to_node(id),
		}
		Some(best)
	}

	/// Draw opacity of a node.
	pub fn node_opacity(&self, id: &str) -> f64 {
		self.session.node_opacity(&self.selection, id)
	}

	/// Draw opacity of a connection.
	pub fn link_opacity(&self, connection: usize) -> f64 {
		self.session.link_opacity(&self.selection, connection)
	}

	/// Minimap canvas height for the current width.
	pub fn minimap_height(&self) -> f64 {
		self.config.minimap.total_height(self.width)
	}

	/// Feed a pointer position, relative to the minimap content area, to an
	/// active drag or click.
	pub fn minimap_pointer(&mut self, x: f64, y: f64) {
		let size = Point::new(
			self.width / self.transform.zoom,
			self.height / self.transform.zoom,
		);
		if let Some(target) = self
			.minimap_drag
			.update(Point::new(x, y), &self.minimap, size)
		{
			self.scroll_to_layout(target);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::{NodeRecord, sample_graph};

	fn state() -> TechTreeState {
		TechTreeState::new(
			&sample_graph(),
			&NodeFilter::default(),
			TreeConfig::default(),
			1200.0,
			700.0,
		)
	}

	fn screen_of(state: &TechTreeState, id: &str) -> Point {
		let position = state.session.node(id).map(|p| p.position).unwrap_or_default();
		state.transform.layout_to_screen(position)
	}

	#[test]
	fn visibility_is_only_recomputed_after_movement() {
		let mut state = state();
		state.refresh_visibility();
		assert!(!state.visible.nodes.is_empty());

		let before = state.visible.clone();
		state.refresh_visibility();
		assert_eq!(state.visible, before);

		state.pan_by(3000.0, 0.0);
		state.refresh_visibility();
		assert_ne!(state.visible.nodes, before.nodes);
	}

	#[test]
	fn scrolling_is_clamped_to_the_layout() {
		let mut state = state();
		state.pan_by(-500.0, -500.0);
		assert_eq!(state.transform.scroll_left, 0.0);
		assert_eq!(state.transform.scroll_top, 0.0);
	}

	#[test]
	fn tall_same_year_group_can_be_scrolled_into_view() {
		let nodes = (0..12)
			.map(|i| NodeRecord {
				id: format!("n{i}"),
				title: format!("Node {i}"),
				year: Some(1900.0),
				..Default::default()
			})
			.collect();
		let data = GraphData {
			nodes,
			links: vec![],
		};
		let mut state =
			TechTreeState::new(&data, &NodeFilter::default(), TreeConfig::default(), 1200.0, 700.0);
		assert_eq!(state.session.node("n0").map(|p| p.position.y), Some(-280.0));

		state.pan_by(0.0, -100_000.0);
		let top = screen_of(&state, "n0");
		assert_eq!(top.y, state.config.layout.padding);

		state.refresh_visibility();
		assert!(state.visible.nodes.contains("n0"));

		// The top node's minimap dot is not drawn above the strip.
		let dot = state.minimap.layout_to_minimap(Point::new(0.0, -280.0));
		assert!(dot.y >= 0.0);
	}

	#[test]
	fn minimap_click_only_scrolls_during_a_drag() {
		let mut state = state();
		state.minimap_pointer(200.0, 10.0);
		assert_eq!(state.transform.scroll_left, 0.0);

		state.minimap_drag.begin();
		state.minimap_pointer(200.0, 10.0);
		assert!(state.transform.scroll_left > 0.0);

		state.minimap_drag.end();
		let left = state.transform.scroll_left;
		state.minimap_pointer(20.0, 10.0);
		assert_eq!(state.transform.scroll_left, left);
	}

	#[test]
	fn hovering_a_node_highlights_its_neighbours() {
		let mut state = state();
		let first = state.session.nodes()[0].position;
		let screen = state.transform.layout_to_screen(first);
		state.set_hover_at(screen.x, screen.y);

		let id = state.session.nodes()[0].node.id.clone();
		assert_eq!(state.hover.node.as_deref(), Some(id.as_str()));
		assert!(!state.hover.neighbours.is_empty());
		assert!(state.is_highlighted(&id));

		state.clear_hover();
		assert!(!state.is_highlighted(&id));
	}

	#[test]
	fn clicking_a_node_selects_and_centres_it() {
		let mut state = state();
		let last = state.session.nodes().last().map(|p| p.node.id.clone()).unwrap_or_default();
		state.select_node(&last);
		assert_eq!(state.selection.node_id(), Some(last.as_str()));
		let screen = screen_of(&state, &last);
		assert!(screen.x > 0.0 && screen.x <= state.width);

		// A tap on the selected card toggles it off.
		state.start_pan(screen.x, screen.y);
		state.finish_pan(screen.x + 1.0, screen.y);
		assert!(state.selection.is_none());
	}

	#[test]
	fn dragging_does_not_count_as_a_click() {
		let mut state = state();
		let first = screen_of(&state, &state.session.nodes()[0].node.id.clone());
		state.start_pan(first.x, first.y);
		state.pan_to_screen(first.x - 50.0, first.y);
		state.finish_pan(first.x - 50.0, first.y);
		assert!(state.selection.is_none());
		assert!(!state.pan.active);
	}

	#[test]
	fn selected_node_stays_visible_after_scrolling_away() {
		let mut state = state();
		let first = state.session.nodes()[0].node.id.clone();
		state.select_node(&first);
		state.pan_by(100_000.0, 0.0);
		state.refresh_visibility();
		assert!(state.visible.nodes.contains(&first));
		assert!(state.visible.stats.node_connections > 0 || !state.visible.connections.is_empty());

		state.clear_selection();
		state.refresh_visibility();
		assert!(!state.visible.nodes.contains(&first));
	}

	#[test]
	fn selection_dims_unrelated_nodes() {
		let mut state = state();
		let first = state.session.nodes()[0].node.id.clone();
		let last = state.session.nodes().last().map(|p| p.node.id.clone()).unwrap_or_default();
		assert_eq!(state.node_opacity(&last), 1.0);

		state.select_node(&first);
		assert_eq!(state.node_opacity(&first), 1.0);
		assert!(state.node_opacity(&last) < 1.0);

		state.toggle_descendants();
		assert_eq!(state.node_opacity(&last), 1.0, "the sample chain reaches the last node");
		state.toggle_descendants();
		assert!(state.node_opacity(&last) < 1.0);
	}

	#[test]
	fn filters_dim_instead_of_removing() {
		let mut state = state();
		let count = state.session.nodes().len();
		state.set_filter(&NodeFilter {
			fields: ["Computing".to_owned()].into(),
			..Default::default()
		});
		assert_eq!(state.session.nodes().len(), count);
		let dimmed = state
			.session
			.nodes()
			.iter()
			.filter(|p| state.node_opacity(&p.node.id) < 1.0)
			.count();
		assert!(dimmed > 0 && dimmed < count);
	}

	#[test]
	fn search_jumps_to_nodes_and_years() {
		let mut state = state();
		let target = state.session.node("tech-17").map(|p| p.node.clone()).unwrap_or_default();
		assert_eq!(target.title, "Printing press");
		let result = state.apply_search(&target.title);
		assert_eq!(result.and_then(|r| r.node_id), Some(target.id.clone()));
		assert_eq!(state.selection.node_id(), Some(target.id.as_str()));

		state.clear_selection();
		state.transform.scroll_left = 0.0;
		let result = state.apply_search(&target.year.to_string());
		assert_eq!(result.map(|r| r.kind), Some(SearchKind::Year));
		let x = state.session.year_x(target.year).unwrap_or_default();
		assert_eq!(state.transform.scroll_left, x - state.width / 2.0);
		assert!(state.selection.is_none());

		assert!(state.apply_search("zzzz no such thing").is_none());
	}
}
