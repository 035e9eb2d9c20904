//! What the user picked, and how strongly everything else is drawn.

use std::collections::HashSet;

/// Opacity of nodes and connections outside the current focus.
pub const DIMMED_OPACITY: f64 = 0.2;

/// The clicked node or connection.
///
/// A selected node may additionally have its ancestor or descendant chain
/// highlighted; both sets include the node itself once computed.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	None,
	/// A node, with optional highlighted relatives.
	Node {
		/// Selected node id.
		id: String,
		/// Highlighted ancestor chain, empty until requested.
		ancestors: HashSet<String>,
		/// Highlighted descendant chain, empty until requested.
		descendants: HashSet<String>,
	},
	/// A connection, by index.
	Link(usize),
}

impl Selection {
	/// Select `id` with nothing highlighted yet.
	pub fn node(id: impl Into<String>) -> Self {
		Self::Node {
			id: id.into(),
			ancestors: HashSet::new(),
			descendants: HashSet::new(),
		}
	}

	/// Id of the selected node.
	pub fn node_id(&self) -> Option<&str> {
		match self {
			Self::Node { id, .. } => Some(id),
			_ => None,
		}
	}

	/// Index of the selected connection.
	pub fn link(&self) -> Option<usize> {
		match self {
			Self::Link(index) => Some(*index),
			_ => None,
		}
	}

	/// True when nothing is selected.
	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}

	/// Whether `id` belongs to a highlighted ancestor or descendant chain.
	pub fn is_highlighted_relative(&self, id: &str) -> bool {
		match self {
			Self::Node {
				ancestors,
				descendants,
				..
			} => ancestors.contains(id) || descendants.contains(id),
			_ => false,
		}
	}

	/// Whether both ends of a connection lie on the same highlighted chain.
	pub fn links_relatives(&self, source: &str, target: &str) -> bool {
		match self {
			Self::Node {
				ancestors,
				descendants,
				..
			} => {
				(ancestors.contains(source) && ancestors.contains(target))
					|| (descendants.contains(source) && descendants.contains(target))
			}
			_ => false,
		}
	}
}
