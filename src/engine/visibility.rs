//! Per-frame culling.
//!
//! A connection is drawn when, checked in this order:
//! (a) its chord touches the buffered viewport,
//! (b) one of its endpoints is a visible node,
//! (c) it matched (a) or (b) on the previous pass.
//!
//! Rule (c) only looks one pass back, so a connection that stops matching is
//! drawn for exactly one more pass and then disappears.
//!
//! On top of that, pinned nodes and connections (the current selection and its
//! highlighted relatives) are visible wherever they are.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::curve::ConnectionCurve;
use super::geometry::Viewport;
use super::spatial_index::SpatialIndex;

/// Scroll and container state, in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportInput {
	/// Horizontal scroll offset.
	pub scroll_left: f64,
	/// Vertical scroll offset.
	pub scroll_top: f64,
	/// Container width.
	pub viewport_width: f64,
	/// Container height.
	pub viewport_height: f64,
	/// Layout → screen scale factor.
	pub zoom: f64,
}

impl ViewportInput {
	/// The part of layout space currently on screen, or `None` before the
	/// container has been measured.
	pub fn strict_viewport(&self) -> Option<Viewport> {
		let measured = [
			self.scroll_left,
			self.scroll_top,
			self.viewport_width,
			self.viewport_height,
			self.zoom,
		]
		.iter()
		.all(|value| value.is_finite());
		if !measured || self.viewport_width <= 0.0 || self.viewport_height <= 0.0 || self.zoom <= 0.0
		{
			return None;
		}
		Some(Viewport::new(
			self.scroll_left / self.zoom,
			self.scroll_top / self.zoom,
			(self.scroll_left + self.viewport_width) / self.zoom,
			(self.scroll_top + self.viewport_height) / self.zoom,
		))
	}
}

/// How many connections each rule contributed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityStats {
	/// Rule (a): chord touches the buffered viewport.
	pub viewport_connections: usize,
	/// Rule (b): anchored to a visible node.
	pub node_connections: usize,
	/// Rule (c): kept from the previous pass.
	pub sticky_connections: usize,
	/// Rule (a) hits whose drawn curve misses the strict viewport.
	pub invisible_viewport_connections: usize,
	/// Pinned connections no rule matched.
	pub pinned_connections: usize,
}

/// Result of one pass, handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleElements {
	/// Ids of the nodes to draw.
	pub nodes: HashSet<String>,
	/// Indices of the connections to draw.
	pub connections: HashSet<usize>,
	/// Per-rule breakdown of `connections`.
	pub stats: VisibilityStats,
}

impl VisibleElements {
	/// True when nothing should be drawn.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.connections.is_empty()
	}
}

/// Node id → indices of every connection touching it.
pub type Adjacency = HashMap<String, Vec<usize>>;

/// Elements that stay visible regardless of the viewport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinnedElements {
	/// Node ids; their connections follow through rule (b).
	pub nodes: HashSet<String>,
	/// Connection indices.
	pub connections: HashSet<usize>,
}

impl PinnedElements {
	/// True when nothing is pinned.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.connections.is_empty()
	}
}

/// Owns the sticky set and the pins between passes.
#[derive(Clone, Debug)]
pub struct VisibilityController {
	buffer: f64,
	previous: HashSet<usize>,
	pinned: PinnedElements,
}

impl VisibilityController {
	/// Controller expanding each viewport by `buffer` layout units.
	pub fn new(buffer: f64) -> Self {
		Self {
			buffer,
			previous: HashSet::new(),
			pinned: PinnedElements::default(),
		}
	}

	/// Prefetch margin.
	pub fn buffer(&self) -> f64 {
		self.buffer
	}

	/// Forget the sticky set and the pins, e.g. after a data reload.
	pub fn reset(&mut self) {
		self.previous.clear();
		self.pinned = PinnedElements::default();
	}

	/// Replace the pinned elements used by later passes.
	pub fn pin(&mut self, pinned: PinnedElements) {
		self.pinned = pinned;
	}

	/// Currently pinned elements.
	pub fn pinned(&self) -> &PinnedElements {
		&self.pinned
	}

	/// Run one culling pass.
	///
	/// An unmeasured container yields an empty result and leaves the sticky set
	/// as it was.
	pub fn compute(
		&mut self,
		index: &SpatialIndex,
		adjacency: &Adjacency,
		input: &ViewportInput,
	) -> VisibleElements {
		let Some(strict) = input.strict_viewport() else {
			return VisibleElements::default();
		};
		let buffered = strict.expand(self.buffer);

		let mut nodes = index.nodes_in_viewport(&buffered);
		nodes.extend(
			self.pinned
				.nodes
				.iter()
				.filter(|id| index.node_position(id).is_some())
				.cloned(),
		);
		let mut connections = HashSet::new();
		let mut stats = VisibilityStats::default();

		for connection in index.connections_in_viewport(&buffered) {
			connections.insert(connection);
			stats.viewport_connections += 1;
			let curve_misses = index
				.connection_line(connection)
				.is_some_and(|line| !ConnectionCurve::between(line.start, line.end).crosses(&strict));
			if curve_misses {
				stats.invisible_viewport_connections += 1;
			}
		}

		for id in &nodes {
			let Some(incident) = adjacency.get(id) else {
				continue;
			};
			for &connection in incident {
				if connections.insert(connection) {
					stats.node_connections += 1;
				}
			}
		}

		for &connection in &self.pinned.connections {
			if index.connection_line(connection).is_some() && connections.insert(connection) {
				stats.pinned_connections += 1;
			}
		}

		// Only matched and pinned entries may carry over; sticky-only ones must decay.
		let matched = connections.clone();
		for &connection in &self.previous {
			if connections.insert(connection) {
				stats.sticky_connections += 1;
			}
		}
		self.previous = matched;

		debug!(
			"visibility: {} nodes, {} connections (viewport {}, node {}, pinned {}, sticky {}, curve-miss {})",
			nodes.len(),
			connections.len(),
			stats.viewport_connections,
			stats.node_connections,
			stats.pinned_connections,
			stats.sticky_connections,
			stats.invisible_viewport_connections,
		);

		VisibleElements {
			nodes,
			connections,
			stats,
		}
	}
}
