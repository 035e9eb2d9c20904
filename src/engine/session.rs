//! One loaded data set and everything derived from it.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::config::{LayoutConfig, VisibilityConfig};
use crate::data::{
	ConnectionType, GraphData, NodeFilter, SearchIndex, SearchResult, TechLink, validate,
};

use super::curve::{ConnectionCurve, MAX_BULGE};
use super::geometry::{Point, Viewport};
use super::layout::{PositionedNode, compute_positions, content_bounds};
use super::selection::{DIMMED_OPACITY, Selection};
use super::spatial_index::SpatialIndex;
use super::visibility::{
	Adjacency, PinnedElements, VisibilityController, VisibleElements, ViewportInput,
};

/// Radius around the pointer, in layout units, that counts as hitting a node.
pub const HIT_RADIUS: f64 = 40.0;

/// Distance from a drawn curve, in layout units, that counts as hitting it.
pub const LINK_HIT_RADIUS: f64 = 6.0;

/// Relationships that do not make one technology the ancestor of another.
fn is_lineage(kind: ConnectionType) -> bool {
	!matches!(
		kind,
		ConnectionType::IndependentlyInvented | ConnectionType::ConcurrentDevelopment
	)
}

/// Positioned nodes, links, the spatial index and the culling state of one load.
pub struct TechTreeSession {
	layout_config: LayoutConfig,
	nodes: Vec<PositionedNode>,
	node_lookup: HashMap<String, usize>,
	links: Vec<TechLink>,
	adjacency: Adjacency,
	index: SpatialIndex,
	controller: VisibilityController,
	search: SearchIndex,
	filter: NodeFilter,
	/// Ids passing `filter`; `None` when no filter is set.
	filtered: Option<HashSet<String>>,
	bounds: Viewport,
}

impl TechTreeSession {
	/// Empty session; call [`TechTreeSession::load`] to populate it.
	pub fn new(layout_config: LayoutConfig, visibility: VisibilityConfig) -> Self {
		Self {
			layout_config,
			nodes: Vec::new(),
			node_lookup: HashMap::new(),
			links: Vec::new(),
			adjacency: Adjacency::new(),
			index: SpatialIndex::new(visibility.cell_size),
			controller: VisibilityController::new(visibility.buffer),
			search: SearchIndex::default(),
			filter: NodeFilter::default(),
			filtered: None,
			bounds: Viewport::default(),
		}
	}

	/// Replace the data set: validate, lay out, rebuild the index from scratch
	/// and reset sticky visibility and pins. The filter is kept.
	pub fn load(&mut self, data: &GraphData) {
		let graph = validate(data);
		self.search = SearchIndex::new(&graph.nodes);
		self.nodes = compute_positions(&graph.nodes, &self.layout_config);
		self.node_lookup = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, positioned)| (positioned.node.id.clone(), i))
			.collect();
		self.links = graph.links;

		self.index.clear();
		self.adjacency.clear();
		self.controller.reset();

		for positioned in &self.nodes {
			self.index.add_node(&positioned.node.id, positioned.position);
		}
		for (i, link) in self.links.iter().enumerate() {
			let (Some(start), Some(end)) = (
				self.index.node_position(&link.source),
				self.index.node_position(&link.target),
			) else {
				continue;
			};
			self.index.add_connection(i, start, end);
			self.adjacency.entry(link.source.clone()).or_default().push(i);
			if link.target != link.source {
				self.adjacency.entry(link.target.clone()).or_default().push(i);
			}
		}

		self.bounds = content_bounds(&self.nodes, &self.layout_config);
		self.apply_filter();
		info!(
			"Loaded {} nodes and {} links ({}x{} layout units from y={})",
			self.nodes.len(),
			self.links.len(),
			self.bounds.width(),
			self.bounds.height(),
			self.bounds.top,
		);
	}

	/// Dim every node `filter` rejects, now and after later loads. Positions
	/// do not change.
	pub fn set_filter(&mut self, filter: &NodeFilter) {
		self.filter = filter.clone();
		self.apply_filter();
	}

	fn apply_filter(&mut self) {
		let filter = &self.filter;
		self.filtered = (!filter.is_empty()).then(|| {
			self.nodes
				.iter()
				.filter(|positioned| filter.matches(&positioned.node))
				.map(|positioned| positioned.node.id.clone())
				.collect()
		});
		if let Some(matching) = &self.filtered {
			debug!("Filter keeps {} of {} nodes", matching.len(), self.nodes.len());
		}
	}

	/// Whether a filter is active.
	pub fn is_filtered(&self) -> bool {
		self.filtered.is_some()
	}

	/// Whether `id` passes the active filter; always true without one.
	pub fn node_matches(&self, id: &str) -> bool {
		self.filtered.as_ref().is_none_or(|matching| matching.contains(id))
	}

	/// Whether either endpoint of a connection passes the active filter.
	pub fn link_matches(&self, connection: usize) -> bool {
		self.links
			.get(connection)
			.is_some_and(|link| self.node_matches(&link.source) || self.node_matches(&link.target))
	}

	/// Run a culling pass for the current scroll/zoom/container state.
	pub fn visible(&mut self, input: &ViewportInput) -> VisibleElements {
		self.controller.compute(&self.index, &self.adjacency, input)
	}

	/// Keep `selection` and its context visible on every later pass.
	pub fn pin(&mut self, selection: &Selection) {
		let pinned = self.pins_for(selection);
		self.controller.pin(pinned);
	}

	/// Elements `selection` keeps on screen: a selected node, every highlighted
	/// relative and their direct neighbours, or a selected link and its ends.
	pub fn pins_for(&self, selection: &Selection) -> PinnedElements {
		let mut pinned = PinnedElements::default();
		match selection {
			Selection::None => {}
			Selection::Node {
				id,
				ancestors,
				descendants,
			} => {
				let required = std::iter::once(id).chain(ancestors).chain(descendants);
				for node in required {
					if self.node(node).is_none() {
						continue;
					}
					pinned.nodes.insert(node.clone());
					pinned.nodes.extend(self.neighbours(node).into_iter().map(str::to_owned));
				}
			}
			Selection::Link(connection) => {
				if let Some(link) = self.links.get(*connection) {
					pinned.nodes.insert(link.source.clone());
					pinned.nodes.insert(link.target.clone());
					pinned.connections.insert(*connection);
				}
			}
		}
		pinned
	}

	/// Draw strength of a node under `selection` and the active filter.
	pub fn node_opacity(&self, selection: &Selection, id: &str) -> f64 {
		let focused = match selection {
			Selection::Node { id: selected, .. } => {
				selected == id
					|| self.neighbours(selected).contains(&id)
					|| selection.is_highlighted_relative(id)
			}
			Selection::Link(connection) => self
				.links
				.get(*connection)
				.is_some_and(|link| link.source == id || link.target == id),
			Selection::None => self.node_matches(id),
		};
		if focused { 1.0 } else { DIMMED_OPACITY }
	}

	/// Draw strength of a connection under `selection` and the active filter.
	pub fn link_opacity(&self, selection: &Selection, connection: usize) -> f64 {
		let Some(link) = self.links.get(connection) else {
			return DIMMED_OPACITY;
		};
		let focused = match selection {
			Selection::Node { id, .. } => {
				selection.links_relatives(&link.source, &link.target)
					|| &link.source == id
					|| &link.target == id
			}
			Selection::Link(selected) => *selected == connection,
			Selection::None => self.link_matches(connection),
		};
		if focused { 1.0 } else { DIMMED_OPACITY }
	}

	/// Every positioned node, ordered by year.
	pub fn nodes(&self) -> &[PositionedNode] {
		&self.nodes
	}

	/// Every validated link; indices match connection indices in the index.
	pub fn links(&self) -> &[TechLink] {
		&self.links
	}

	/// Positioned node by id.
	pub fn node(&self, id: &str) -> Option<&PositionedNode> {
		self.node_lookup.get(id).map(|&i| &self.nodes[i])
	}

	/// Drawn curve of a connection, if both endpoints are indexed.
	pub fn curve(&self, connection: usize) -> Option<ConnectionCurve> {
		self.index
			.connection_line(connection)
			.map(|line| ConnectionCurve::between(line.start, line.end))
	}

	/// Scrollable region holding every node. `top` is negative when a tall
	/// same-year group fans out above the origin.
	pub fn bounds(&self) -> Viewport {
		self.bounds
	}

	/// Closest node within [`HIT_RADIUS`] of a layout-space point.
	pub fn node_at(&self, point: Point) -> Option<&PositionedNode> {
		let area = Viewport::new(
			point.x - HIT_RADIUS,
			point.y - HIT_RADIUS,
			point.x + HIT_RADIUS,
			point.y + HIT_RADIUS,
		);
		self.index
			.nodes_in_viewport(&area)
			.iter()
			.filter_map(|id| self.node(id))
			.map(|node| {
				let (dx, dy) = (node.position.x - point.x, node.position.y - point.y);
				(node, dx * dx + dy * dy)
			})
			.filter(|(_, distance_sq)| *distance_sq <= HIT_RADIUS * HIT_RADIUS)
			.min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.node.id.cmp(&b.0.node.id)))
			.map(|(node, _)| node)
	}

	/// Lowest-indexed connection whose drawn curve passes within
	/// [`LINK_HIT_RADIUS`] of a layout-space point.
	pub fn connection_at(&self, point: Point) -> Option<usize> {
		let target = Viewport::new(
			point.x - LINK_HIT_RADIUS,
			point.y - LINK_HIT_RADIUS,
			point.x + LINK_HIT_RADIUS,
			point.y + LINK_HIT_RADIUS,
		);
		self.index
			.connections_in_viewport(&target.expand(MAX_BULGE))
			.into_iter()
			.filter(|&connection| {
				self.curve(connection)
					.is_some_and(|curve| curve.crosses(&target))
			})
			.min()
	}

	/// Ids of the nodes directly linked to `id`, in either direction.
	pub fn neighbours(&self, id: &str) -> Vec<&str> {
		self.adjacency
			.get(id)
			.into_iter()
			.flatten()
			.filter_map(|&i| self.links.get(i))
			.map(|link| {
				if link.source == id {
					link.target.as_str()
				} else {
					link.source.as_str()
				}
			})
			.collect()
	}

	/// `id` and every node it transitively builds on. Parallel inventions do
	/// not count as lineage.
	pub fn ancestors(&self, id: &str) -> HashSet<String> {
		self.lineage(id, |link| (link.target.as_str(), link.source.as_str()))
	}

	/// `id` and every node transitively building on it.
	pub fn descendants(&self, id: &str) -> HashSet<String> {
		self.lineage(id, |link| (link.source.as_str(), link.target.as_str()))
	}

	/// Walk lineage links from `id`; `step` maps a link to `(from, to)`.
	fn lineage<'a>(
		&'a self,
		id: &str,
		step: impl Fn(&'a TechLink) -> (&'a str, &'a str),
	) -> HashSet<String> {
		let mut visited = HashSet::new();
		if self.node(id).is_none() {
			return visited;
		}
		visited.insert(id.to_owned());
		let mut pending = vec![id.to_owned()];
		while let Some(current) = pending.pop() {
			let incident = self.adjacency.get(&current).into_iter().flatten();
			for link in incident.filter_map(|&i| self.links.get(i)) {
				let (from, to) = step(link);
				if from == current && is_lineage(link.kind) && visited.insert(to.to_owned()) {
					pending.push(to.to_owned());
				}
			}
		}
		visited
	}

	/// Rank technologies and years against `query`.
	pub fn search(&self, query: &str) -> Vec<SearchResult> {
		self.search.search(query)
	}

	/// Layout x of the column closest to `year`.
	pub fn year_x(&self, year: i32) -> Option<f64> {
		self.nodes
			.iter()
			.min_by_key(|positioned| (i64::from(positioned.node.year) - i64::from(year)).abs())
			.map(|positioned| positioned.position.x)
	}
}
