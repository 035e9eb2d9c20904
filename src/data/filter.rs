use std::collections::HashSet;

use leptos_router::params::ParamsMap;

use super::types::TechNode;

/// Field and location filter selected through the page query string.
///
/// Each non-empty set must match; an entirely empty filter keeps every node.
/// Nodes that do not match stay laid out and are only dimmed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeFilter {
	/// Subject areas; a node matches when any of its fields is listed.
	pub fields: HashSet<String>,
	/// Historical or modern countries.
	pub countries: HashSet<String>,
	/// City names.
	pub cities: HashSet<String>,
}

impl NodeFilter {
	/// True when no criterion is set.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty() && self.countries.is_empty() && self.cities.is_empty()
	}

	/// Whether `node` passes every active criterion.
	pub fn matches(&self, node: &TechNode) -> bool {
		fn any_listed(wanted: &HashSet<String>, values: &[String]) -> bool {
			wanted.is_empty() || values.iter().any(|value| wanted.contains(value))
		}
		any_listed(&self.fields, &node.fields)
			&& any_listed(&self.countries, &node.countries)
			&& any_listed(&self.cities, &node.cities)
	}

	/// Build from decoded query parameters: `fields=A,B&countries=C&cities=D`.
	pub fn from_params(params: &ParamsMap) -> Self {
		Self::from_pairs(params)
	}

	/// Build from decoded `(key, value)` pairs.
	///
	/// Repeated keys accumulate; singular spellings are accepted and unknown
	/// keys ignored.
	pub fn from_pairs<'a, K: AsRef<str>>(pairs: impl IntoIterator<Item = (K, &'a str)>) -> Self {
		let mut filter = Self::default();
		for (key, value) in pairs {
			let target = match key.as_ref() {
				"fields" | "field" => &mut filter.fields,
				"countries" | "country" => &mut filter.countries,
				"cities" | "city" => &mut filter.cities,
				_ => continue,
			};
			target.extend(
				value
					.split(',')
					.map(str::trim)
					.filter(|item| !item.is_empty())
					.map(str::to_owned),
			);
		}
		filter
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(fields: &[&str], countries: &[&str], cities: &[&str]) -> TechNode {
		TechNode {
			id: "n".into(),
			year: 1900,
			title: "Node".into(),
			fields: fields.iter().map(|s| s.to_string()).collect(),
			countries: countries.iter().map(|s| s.to_string()).collect(),
			cities: cities.iter().map(|s| s.to_string()).collect(),
			..Default::default()
		}
	}

	#[test]
	fn empty_filter_matches_everything() {
		let filter = NodeFilter::default();
		assert!(filter.is_empty());
		assert!(filter.matches(&node(&[], &[], &[])));
		assert!(NodeFilter::from_params(&ParamsMap::new()).is_empty());
	}

	#[test]
	fn every_active_criterion_must_match() {
		let filter =
			NodeFilter::from_pairs([("fields", "Computing,Energy"), ("countries", "France")]);
		assert!(filter.matches(&node(&["Energy"], &["France"], &[])));
		assert!(!filter.matches(&node(&["Energy"], &["Italy"], &[])));
		assert!(!filter.matches(&node(&["Music"], &["France"], &[])));
	}

	#[test]
	fn any_city_of_a_multi_city_node_matches() {
		let filter = NodeFilter::from_pairs([("cities", "London")]);
		let record = crate::data::NodeRecord {
			id: "radio".into(),
			year: Some(1895.0),
			city: Some("Paris, London".into()),
			..Default::default()
		};
		let radio = TechNode::from_record(&record).unwrap();
		assert!(filter.matches(&radio));
		assert!(!filter.matches(&node(&[], &[], &["Paris"])));
	}

	#[test]
	fn values_are_split_and_trimmed_and_unknown_keys_ignored() {
		let filter = NodeFilter::from_pairs([
			("fields", "Visual media , Music"),
			("city", "New York"),
			("fields", "Energy"),
			("unknown", "1"),
		]);
		assert!(filter.fields.contains("Visual media"));
		assert!(filter.fields.contains("Music"));
		assert!(filter.fields.contains("Energy"));
		assert!(filter.cities.contains("New York"));
		assert!(filter.countries.is_empty());
	}
}
