//! Uniform grid over layout space for viewport culling.
//!
//! Nodes are stored as points, connections as their straight source→target
//! segment. Cells only narrow the candidate set; every query re-checks the exact
//! geometry, so coarse cells never produce false positives.

use std::collections::{HashMap, HashSet};

use super::geometry::{Point, Segment, Viewport};

/// Cell size used when none is configured.
pub const DEFAULT_CELL_SIZE: f64 = 1000.0;

type CellKey = (i64, i64);

/// Grid-bucketed index of node positions and connection segments.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
	cell_size: f64,
	node_cells: HashMap<CellKey, HashSet<String>>,
	connection_cells: HashMap<CellKey, HashSet<usize>>,
	node_positions: HashMap<String, Point>,
	connection_lines: HashMap<usize, Segment>,
}

impl Default for SpatialIndex {
	fn default() -> Self {
		Self::new(DEFAULT_CELL_SIZE)
	}
}

impl SpatialIndex {
	/// Create an empty index. `cell_size` must be positive and finite.
	pub fn new(cell_size: f64) -> Self {
		Self {
			cell_size,
			node_cells: HashMap::new(),
			connection_cells: HashMap::new(),
			node_positions: HashMap::new(),
			connection_lines: HashMap::new(),
		}
	}

	/// Edge length of a grid cell.
	pub fn cell_size(&self) -> f64 {
		self.cell_size
	}

	fn cell_coord(&self, value: f64) -> i64 {
		(value / self.cell_size).floor() as i64
	}

	fn cell_for(&self, point: Point) -> CellKey {
		(self.cell_coord(point.x), self.cell_coord(point.y))
	}

	fn cells_for_bounds(&self, bounds: &Viewport) -> impl Iterator<Item = CellKey> + use<> {
		let (start_x, end_x) = (self.cell_coord(bounds.left), self.cell_coord(bounds.right));
		let (start_y, end_y) = (self.cell_coord(bounds.top), self.cell_coord(bounds.bottom));
		(start_x..=end_x).flat_map(move |x| (start_y..=end_y).map(move |y| (x, y)))
	}

	// The rendered curve bulges past its chord, so pad by half a cell.
	fn cells_for_line(&self, line: &Segment) -> impl Iterator<Item = CellKey> + use<> {
		self.cells_for_bounds(&line.bounds().expand(self.cell_size / 2.0))
	}

	/// Register or move a node. Any previous cell membership is dropped first.
	pub fn add_node(&mut self, id: &str, position: Point) {
		self.remove_node(id);
		self.node_positions.insert(id.to_owned(), position);
		let cell = self.cell_for(position);
		self.node_cells
			.entry(cell)
			.or_default()
			.insert(id.to_owned());
	}

	/// Forget a node. Unknown ids are ignored.
	pub fn remove_node(&mut self, id: &str) {
		let Some(position) = self.node_positions.remove(id) else {
			return;
		};
		let cell = self.cell_for(position);
		if let Some(ids) = self.node_cells.get_mut(&cell) {
			ids.remove(id);
		}
	}

	/// Register or move a connection segment.
	pub fn add_connection(&mut self, index: usize, start: Point, end: Point) {
		self.remove_connection(index);
		let line = Segment::new(start, end);
		for cell in self.cells_for_line(&line) {
			self.connection_cells.entry(cell).or_default().insert(index);
		}
		self.connection_lines.insert(index, line);
	}

	/// Forget a connection. Unknown indices are ignored.
	pub fn remove_connection(&mut self, index: usize) {
		let Some(line) = self.connection_lines.remove(&index) else {
			return;
		};
		for cell in self.cells_for_line(&line) {
			if let Some(indices) = self.connection_cells.get_mut(&cell) {
				indices.remove(&index);
			}
		}
	}

	/// Ids of nodes whose exact position lies inside `viewport`.
	pub fn nodes_in_viewport(&self, viewport: &Viewport) -> HashSet<String> {
		let mut result = HashSet::new();
		for cell in self.cells_for_bounds(viewport) {
			let Some(ids) = self.node_cells.get(&cell) else {
				continue;
			};
			for id in ids {
				if self
					.node_positions
					.get(id)
					.is_some_and(|&position| viewport.contains(position))
				{
					result.insert(id.clone());
				}
			}
		}
		result
	}

	/// Indices of connections whose segment touches `viewport`.
	pub fn connections_in_viewport(&self, viewport: &Viewport) -> HashSet<usize> {
		let mut result = HashSet::new();
		for cell in self.cells_for_bounds(viewport) {
			let Some(indices) = self.connection_cells.get(&cell) else {
				continue;
			};
			for &index in indices {
				if result.contains(&index) {
					continue;
				}
				if self
					.connection_lines
					.get(&index)
					.is_some_and(|line| viewport.intersects_segment(line))
				{
					result.insert(index);
				}
			}
		}
		result
	}

	/// Stored position of a node.
	pub fn node_position(&self, id: &str) -> Option<Point> {
		self.node_positions.get(id).copied()
	}

	/// Stored segment of a connection.
	pub fn connection_line(&self, index: usize) -> Option<Segment> {
		self.connection_lines.get(&index).copied()
	}

	/// Number of indexed nodes.
	pub fn node_count(&self) -> usize {
		self.node_positions.len()
	}

	/// Number of indexed connections.
	pub fn connection_count(&self) -> usize {
		self.connection_lines.len()
	}

	/// True when nothing is indexed.
	pub fn is_empty(&self) -> bool {
		self.node_positions.is_empty() && self.connection_lines.is_empty()
	}

	/// Drop every node, connection and cell.
	pub fn clear(&mut self) {
		self.node_cells.clear();
		self.connection_cells.clear();
		self.node_positions.clear();
		self.connection_lines.clear();
	}

	#[cfg(test)]
	fn node_memberships(&self, id: &str) -> usize {
		self.node_cells.values().filter(|ids| ids.contains(id)).count()
	}

	#[cfg(test)]
	fn connection_memberships(&self, index: usize) -> usize {
		self.connection_cells
			.values()
			.filter(|indices| indices.contains(&index))
			.count()
	}
}
