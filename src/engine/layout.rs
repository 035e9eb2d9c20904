//! Places technologies on the time axis.
//!
//! Each distinct year gets its own column, one `year_width` apart, in
//! chronological order. Nodes sharing a year fan out vertically around
//! `base_y` so they never overlap.

use crate::config::LayoutConfig;
use crate::data::TechNode;

use super::geometry::{Point, Viewport};

/// A node together with its derived layout position.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// The validated node.
	pub node: TechNode,
	/// Centre of the node in layout space.
	pub position: Point,
}

/// Compute positions for every node.
///
/// The output is ordered by year; nodes sharing a year keep their input order
/// (stable sort), which also fixes their vertical order within the column.
pub fn compute_positions(nodes: &[TechNode], config: &LayoutConfig) -> Vec<PositionedNode> {
	let mut sorted: Vec<&TechNode> = nodes.iter().collect();
	sorted.sort_by_key(|node| node.year);

	let mut positioned = Vec::with_capacity(sorted.len());
	let mut column = 0usize;
	let mut group_start = 0usize;
	while group_start < sorted.len() {
		let year = sorted[group_start].year;
		let group_len = sorted[group_start..]
			.iter()
			.take_while(|node| node.year == year)
			.count();

		let x = config.padding + column as f64 * config.year_width;
		let centre = (group_len as f64 - 1.0) / 2.0;
		for (offset, node) in sorted[group_start..group_start + group_len].iter().enumerate() {
			let y = config.base_y + (offset as f64 - centre) * config.vertical_spacing;
			positioned.push(PositionedNode {
				node: (*node).clone(),
				position: Point::new(x, y),
			});
		}

		column += 1;
		group_start += group_len;
	}
	positioned
}

/// Width of the scrollable area needed to show every positioned node.
pub fn total_width(nodes: &[PositionedNode], config: &LayoutConfig) -> f64 {
	nodes
		.iter()
		.map(|node| node.position.x)
		.fold(None, |max: Option<f64>, x| Some(max.map_or(x, |m| m.max(x))))
		.map_or(0.0, |max| max + config.padding)
}

/// Height of the scrollable area needed to show every positioned node.
pub fn total_height(nodes: &[PositionedNode], config: &LayoutConfig) -> f64 {
	nodes
		.iter()
		.map(|node| node.position.y)
		.fold(None, |max: Option<f64>, y| Some(max.map_or(y, |m| m.max(y))))
		.map_or(0.0, |max| max + config.padding)
}

/// Scrollable region holding every node.
///
/// Starts at the origin unless a tall same-year group fans out above it, in
/// which case `top` goes negative by the overflow plus `padding`.
pub fn content_bounds(nodes: &[PositionedNode], config: &LayoutConfig) -> Viewport {
	let top = nodes
		.iter()
		.map(|node| node.position.y - config.padding)
		.fold(0.0, f64::min);
	Viewport::new(0.0, top, total_width(nodes, config), total_height(nodes, config))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::collections::HashMap;

	fn tech(id: &str, year: i32) -> TechNode {
		TechNode {
			id: id.into(),
			year,
			title: id.into(),
			..Default::default()
		}
	}

	#[test]
	fn empty_input_yields_empty_output() {
		let config = LayoutConfig::default();
		let positioned = compute_positions(&[], &config);
		assert!(positioned.is_empty());
		assert_eq!(total_width(&positioned, &config), 0.0);
	}

	#[test]
	fn single_node_sits_on_the_baseline() {
		let positioned = compute_positions(&[tech("fire", -400000)], &LayoutConfig::default());
		assert_eq!(positioned[0].position, Point::new(120.0, 600.0));
	}

	#[test]
	fn three_nodes_two_years() {
		let nodes = [tech("bronze", -1000), tech("zero", 0), tech("calendar", 0)];
		let positioned = compute_positions(&nodes, &LayoutConfig::default());

		let placed: Vec<(&str, Point)> = positioned
			.iter()
			.map(|p| (p.node.id.as_str(), p.position))
			.collect();
		assert_eq!(
			placed,
			vec![
				("bronze", Point::new(120.0, 600.0)),
				("zero", Point::new(260.0, 520.0)),
				("calendar", Point::new(260.0, 680.0)),
			]
		);
	}

	#[test]
	fn input_order_is_irrelevant_across_years_but_stable_within_one() {
		let nodes = [tech("b", 5), tech("a", 1), tech("c", 5)];
		let positioned = compute_positions(&nodes, &LayoutConfig::default());
		let ids: Vec<&str> = positioned.iter().map(|p| p.node.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b", "c"]);
		assert!(positioned[1].position.y < positioned[2].position.y);
	}

	#[test]
	fn layout_does_not_touch_its_input() {
		let nodes = vec![tech("a", 3), tech("b", 1)];
		let before = nodes.clone();
		let first = compute_positions(&nodes, &LayoutConfig::default());
		let second = compute_positions(&nodes, &LayoutConfig::default());
		assert_eq!(nodes, before);
		assert_eq!(first, second);
	}

	#[test]
	fn extents_cover_the_furthest_node() {
		let config = LayoutConfig::default();
		let positioned = compute_positions(&[tech("a", 0), tech("b", 10), tech("c", 10)], &config);
		assert_eq!(total_width(&positioned, &config), 260.0 + config.padding);
		assert_eq!(total_height(&positioned, &config), 680.0 + config.padding);
	}

	#[test]
	fn tall_same_year_groups_extend_the_content_upwards() {
		let config = LayoutConfig::default();
		let nodes: Vec<TechNode> = (0..12).map(|i| tech(&i.to_string(), 1900)).collect();
		let positioned = compute_positions(&nodes, &config);
		let highest = positioned.iter().map(|p| p.position.y).fold(f64::INFINITY, f64::min);
		assert_eq!(highest, -280.0);

		let bounds = content_bounds(&positioned, &config);
		assert_eq!(bounds.top, highest - config.padding);
		assert_eq!(bounds.left, 0.0);
		assert_eq!(bounds.bottom, 1480.0 + config.padding);

		let short = compute_positions(&[tech("a", 1), tech("b", 1)], &config);
		assert_eq!(content_bounds(&short, &config).top, 0.0);
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(100))]

		#[test]
		fn prop_same_year_offsets_are_symmetric(years in prop::collection::vec(-50i32..50, 0..60)) {
			let config = LayoutConfig::default();
			let nodes: Vec<TechNode> = years
				.iter()
				.enumerate()
				.map(|(i, &year)| tech(&i.to_string(), year))
				.collect();
			let positioned = compute_positions(&nodes, &config);
			prop_assert_eq!(positioned.len(), nodes.len());

			let mut groups: HashMap<i32, Vec<f64>> = HashMap::new();
			for p in &positioned {
				groups.entry(p.node.year).or_default().push(p.position.y - config.base_y);
			}
			for offsets in groups.values() {
				let k = offsets.len();
				let sum: f64 = offsets.iter().sum();
				prop_assert!(sum.abs() < 1e-6);
				for (i, offset) in offsets.iter().enumerate() {
					let expected = (i as f64 - (k as f64 - 1.0) / 2.0) * config.vertical_spacing;
					prop_assert!((offset - expected).abs() < 1e-9);
				}
			}
		}

		#[test]
		fn prop_x_is_strictly_monotonic_in_year(years in prop::collection::vec(-5000i32..2025, 1..60)) {
			let nodes: Vec<TechNode> = years
				.iter()
				.enumerate()
				.map(|(i, &year)| tech(&i.to_string(), year))
				.collect();
			let positioned = compute_positions(&nodes, &LayoutConfig::default());
			for a in &positioned {
				for b in &positioned {
					if a.node.year < b.node.year {
						prop_assert!(a.position.x < b.position.x);
					} else if a.node.year == b.node.year {
						prop_assert_eq!(a.position.x, b.position.x);
					}
				}
			}
		}
	}
}
