use std::collections::HashSet;

use log::warn;

use super::types::{GraphData, TechLink, TechNode};

/// Nodes and links that survived validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidatedGraph {
	/// Valid nodes, in input order.
	pub nodes: Vec<TechNode>,
	/// Links whose endpoints are both in `nodes`.
	pub links: Vec<TechLink>,
}

/// Turn a raw document into a referentially valid graph.
///
/// Nodes without a usable year or with a duplicate id are dropped, then links
/// are kept only when both endpoints survived. Node order follows the input.
pub fn validate(data: &GraphData) -> ValidatedGraph {
	let mut seen = HashSet::new();
	let mut dropped_nodes = 0usize;
	let mut nodes = Vec::with_capacity(data.nodes.len());
	for record in &data.nodes {
		let Some(node) = TechNode::from_record(record) else {
			dropped_nodes += 1;
			continue;
		};
		if !seen.insert(node.id.clone()) {
			dropped_nodes += 1;
			continue;
		}
		nodes.push(node);
	}

	if dropped_nodes > 0 {
		warn!("Dropped {dropped_nodes} node(s) without a valid year or with a duplicate id");
	}

	let present: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
	let mut dangling = 0usize;
	let links = data
		.links
		.iter()
		.filter(|link| {
			let resolved =
				present.contains(link.source.as_str()) && present.contains(link.target.as_str());
			if !resolved {
				dangling += 1;
			}
			resolved
		})
		.map(|link| TechLink {
			source: link.source.clone(),
			target: link.target.clone(),
			kind: link.kind,
			details: link.details.clone(),
		})
		.collect();

	if dangling > 0 {
		warn!("Skipped {dangling} link(s) referencing missing nodes");
	}

	ValidatedGraph { nodes, links }
}
