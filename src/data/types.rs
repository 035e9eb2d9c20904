use serde::{Deserialize, Serialize};

/// Kind of relationship between two technologies.
///
/// Every kind is indexed and culled the same way; only the stroke differs.
/// Unknown wire names fall back to [`ConnectionType::Default`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
	/// Target cannot exist without source.
	Prerequisite,
	/// Target refines source.
	Improvement,
	/// A suspected but unproven dependency.
	Speculative,
	/// Source inspired target.
	Inspiration,
	/// Source is a part of target.
	Component,
	/// Same idea arrived at separately.
	IndependentlyInvented,
	/// Possibly related, evidence thin.
	LinkPlausibleButUnclear,
	/// Developed side by side.
	ConcurrentDevelopment,
	/// Target replaced source.
	Obsolescence,
	/// Anything else.
	#[default]
	Default,
}

impl ConnectionType {
	/// Every variant, in legend order.
	pub const ALL: [ConnectionType; 10] = [
		Self::Prerequisite,
		Self::Improvement,
		Self::Speculative,
		Self::Inspiration,
		Self::Component,
		Self::IndependentlyInvented,
		Self::LinkPlausibleButUnclear,
		Self::ConcurrentDevelopment,
		Self::Obsolescence,
		Self::Default,
	];

	/// Name used by the data source.
	pub fn wire_name(self) -> &'static str {
		match self {
			Self::Prerequisite => "Prerequisite",
			Self::Improvement => "Improvement",
			Self::Speculative => "Speculative",
			Self::Inspiration => "Inspiration",
			Self::Component => "Component",
			Self::IndependentlyInvented => "Independently invented",
			Self::LinkPlausibleButUnclear => "Link plausible but unclear",
			Self::ConcurrentDevelopment => "Concurrent development",
			Self::Obsolescence => "Obsolescence",
			Self::Default => "default",
		}
	}
}

impl From<String> for ConnectionType {
	fn from(name: String) -> Self {
		Self::ALL
			.into_iter()
			.find(|kind| kind.wire_name() == name)
			.unwrap_or_default()
	}
}

impl From<ConnectionType> for String {
	fn from(kind: ConnectionType) -> Self {
		kind.wire_name().to_owned()
	}
}

/// A node as delivered by the data source. `year` may be missing or malformed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
	/// Unique, opaque identifier.
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub title: String,
	/// Short qualifier shown under the title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtitle: Option<String>,
	/// Negative for BCE. Non-integral years are rounded on validation.
	#[serde(default)]
	pub year: Option<f64>,
	/// Free-form precision note for `year`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date_details: Option<String>,
	/// Subject areas, e.g. `"Energy"`.
	#[serde(default)]
	pub fields: Vec<String>,
	/// Long description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// People credited with the invention.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub inventors: Vec<String>,
	/// Organizations credited with the invention.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub organizations: Vec<String>,
	/// Article URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub wikipedia: Option<String>,
	/// Image URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	/// Comma-separated country names at the time of invention.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_historical: Option<String>,
	/// Comma-separated present-day country names.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_modern: Option<String>,
	/// Comma-separated city names.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
}

/// A link as delivered by the data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
	/// Id of the earlier technology.
	pub source: String,
	/// Id of the technology that builds on `source`.
	pub target: String,
	/// Relationship kind; unknown names become `Default`.
	#[serde(rename = "type", default)]
	pub kind: ConnectionType,
	/// Free-form explanation of the relationship.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}

/// The `{nodes, links}` document served by the API and stored in the cache.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Every technology record.
	pub nodes: Vec<NodeRecord>,
	/// Every relationship record.
	pub links: Vec<LinkRecord>,
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
	raw.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(str::to_owned)
}

/// A validated technology: the year is known and integral.
///
/// Everything other than `id` and `year` is payload the engine never inspects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TechNode {
	/// Unique, opaque identifier.
	pub id: String,
	/// Year of invention, negative for BCE.
	pub year: i32,
	/// Display name.
	pub title: String,
	/// Short qualifier shown under the title.
	pub subtitle: Option<String>,
	/// Long description.
	pub description: Option<String>,
	/// Subject areas, e.g. `"Energy"`.
	pub fields: Vec<String>,
	/// People credited with the invention.
	pub inventors: Vec<String>,
	/// Organizations credited with the invention.
	pub organizations: Vec<String>,
	/// Historical and modern countries, split and trimmed.
	pub countries: Vec<String>,
	/// Split and trimmed like `countries`.
	pub cities: Vec<String>,
}

impl TechNode {
	/// Validate a record, rejecting empty ids and missing or non-finite years.
	pub fn from_record(record: &NodeRecord) -> Option<Self> {
		let year = record.year.filter(|year| year.is_finite())?;
		if record.id.is_empty() {
			return None;
		}
		let countries = [&record.country_historical, &record.country_modern]
			.into_iter()
			.flatten()
			.flat_map(|list| split_list(list))
			.collect();
		let cities = record.city.as_deref().map(split_list).into_iter().flatten().collect();
		Some(Self {
			id: record.id.clone(),
			year: year.round() as i32,
			title: record.title.clone(),
			subtitle: record.subtitle.clone(),
			description: record.description.clone(),
			fields: record.fields.clone(),
			inventors: record.inventors.clone(),
			organizations: record.organizations.clone(),
			countries,
			cities,
		})
	}
}

/// A link whose endpoints both resolved to nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct TechLink {
	/// Id of the earlier technology.
	pub source: String,
	/// Id of the technology that builds on `source`.
	pub target: String,
	/// Relationship kind; unknown names become `Default`.
	pub kind: ConnectionType,
	/// Free-form explanation of the relationship.
	pub details: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn connection_types_parse_from_wire_names() {
		let raw = r#"[
			"Prerequisite", "Independently invented", "Link plausible but unclear",
			"Concurrent development", "Obsolescence", "default", "Something new"
		]"#;
		let kinds: Vec<ConnectionType> = serde_json::from_str(raw).unwrap();
		assert_eq!(
			kinds,
			vec![
				ConnectionType::Prerequisite,
				ConnectionType::IndependentlyInvented,
				ConnectionType::LinkPlausibleButUnclear,
				ConnectionType::ConcurrentDevelopment,
				ConnectionType::Obsolescence,
				ConnectionType::Default,
				ConnectionType::Default,
			]
		);
	}

	#[test]
	fn graph_document_deserializes_with_missing_optionals() {
		let raw = r#"{
			"nodes": [
				{"id": "a", "title": "Fire", "year": -400000, "fields": ["Energy"]},
				{"id": "b", "title": "Wheel", "year": -3500, "countryModern": "Iraq, Iran"}
			],
			"links": [{"source": "a", "target": "b", "type": "Inspiration"}]
		}"#;
		let data: GraphData = serde_json::from_str(raw).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.links[0].kind, ConnectionType::Inspiration);
		assert_eq!(data.links[0].details, None);

		let wheel = TechNode::from_record(&data.nodes[1]).unwrap();
		assert_eq!(wheel.year, -3500);
		assert_eq!(wheel.countries, vec!["Iraq".to_owned(), "Iran".to_owned()]);
	}

	#[test]
	fn multi_city_records_are_split() {
		let record = NodeRecord {
			id: "radio".into(),
			year: Some(1895.0),
			city: Some("Paris, London ,".into()),
			..Default::default()
		};
		let node = TechNode::from_record(&record).unwrap();
		assert_eq!(node.cities, vec!["Paris".to_owned(), "London".to_owned()]);
	}

	#[test]
	fn records_without_a_finite_year_are_rejected() {
		let mut record = NodeRecord {
			id: "x".into(),
			..Default::default()
		};
		assert_eq!(TechNode::from_record(&record), None);

		record.year = Some(f64::NAN);
		assert_eq!(TechNode::from_record(&record), None);

		record.year = Some(1879.0);
		assert_eq!(TechNode::from_record(&record).map(|node| node.year), Some(1879));
	}
}
