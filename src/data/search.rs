//! Free-text and year search over the loaded technologies.

use crate::engine::coords::format_year;

use super::types::TechNode;

/// At most this many results are returned.
pub const MAX_RESULTS: usize = 10;

/// What a search result points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
	/// A year on the time axis.
	Year,
	/// A technology matched by title or subtitle.
	Node,
	/// A technology matched by one of its inventors.
	Person,
	/// A technology matched by one of its organizations.
	Organization,
}

/// One ranked hit.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
	/// What matched.
	pub kind: SearchKind,
	/// Main line.
	pub text: String,
	/// Secondary line.
	pub subtext: Option<String>,
	/// Higher ranks first.
	pub score: u32,
	/// Technology to select; `None` for year results.
	pub node_id: Option<String>,
	/// Target year for year results, the technology's year otherwise.
	pub year: i32,
}

#[derive(Clone, Debug)]
struct Entry {
	node: TechNode,
	/// Every searchable string, lowercased and joined.
	text: String,
	/// Lowercased `kind:value` tags.
	tags: Vec<String>,
}

impl Entry {
	fn new(node: &TechNode) -> Self {
		let text = [&node.title]
			.into_iter()
			.chain(&node.subtitle)
			.chain(&node.description)
			.chain(&node.inventors)
			.chain(&node.organizations)
			.chain(&node.fields)
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join(" ")
			.to_lowercase();

		let mut tags = vec![format!("title:{}", node.title.to_lowercase())];
		tags.extend(node.subtitle.iter().map(|s| format!("subtitle:{}", s.to_lowercase())));
		tags.extend(node.inventors.iter().map(|s| format!("inventor:{}", s.to_lowercase())));
		tags.extend(node.organizations.iter().map(|s| format!("org:{}", s.to_lowercase())));
		tags.extend(node.fields.iter().map(|s| format!("field:{}", s.to_lowercase())));

		Self {
			node: node.clone(),
			text,
			tags,
		}
	}

	fn matches_all(&self, terms: &[&str]) -> bool {
		terms
			.iter()
			.all(|term| self.text.contains(term) || self.tags.iter().any(|tag| tag.contains(term)))
	}
}

/// Parse `"1850"`, `"-3000"`, `"500 BC"` or `"500bce"` into
/// `(typed number, BCE suffix present)`.
fn parse_year(query: &str) -> Option<(i32, bool)> {
	let lower = query.trim().to_lowercase();
	let (number, bce) = match lower.strip_suffix("bce").or_else(|| lower.strip_suffix("bc")) {
		Some(rest) => (rest.trim_end(), true),
		None => (lower.as_str(), false),
	};
	let digits = number.strip_prefix('-').unwrap_or(number);
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	number.parse().ok().map(|year| (year, bce))
}

/// Lowercased text index of every technology, in data order.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
	entries: Vec<Entry>,
	years: Option<(i32, i32)>,
}

impl SearchIndex {
	/// Index `nodes`; results for equal scores keep this order.
	pub fn new(nodes: &[TechNode]) -> Self {
		let years = nodes.iter().map(|node| node.year).fold(None, |range, year| {
			Some(match range {
				None => (year, year),
				Some((min, max)) => (year.min(min), year.max(max)),
			})
		});
		Self {
			entries: nodes.iter().map(Entry::new).collect(),
			years,
		}
	}

	/// Number of indexed technologies.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when nothing is indexed.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Rank technologies and years against `query`.
	///
	/// A year inside the data range comes first. Technologies must contain
	/// every whitespace-separated term; a title hit scores 10, a subtitle hit 5,
	/// otherwise an inventor hit 5 or an organization hit 3.
	pub fn search(&self, query: &str) -> Vec<SearchResult> {
		let query = query.trim();
		if query.is_empty() {
			return Vec::new();
		}
		let mut results = Vec::new();

		if let (Some((typed, bce)), Some((min, max))) = (parse_year(query), self.years) {
			let year = if bce { -typed } else { typed };
			if year != 0 && (min..=max).contains(&year) {
				let label = if bce { format!("{typed} BCE") } else { typed.to_string() };
				results.push(SearchResult {
					kind: SearchKind::Year,
					text: format!("Go to year {label}"),
					subtext: None,
					score: 1000,
					node_id: None,
					year,
				});
			}
		}

		let lower = query.to_lowercase();
		let terms: Vec<&str> = lower.split_whitespace().collect();
		for entry in &self.entries {
			if results.len() >= MAX_RESULTS {
				break;
			}
			if !entry.matches_all(&terms) {
				continue;
			}
			if let Some(result) = Self::rank(&entry.node, &lower) {
				results.push(result);
			}
		}

		results.sort_by(|a, b| b.score.cmp(&a.score));
		results.truncate(MAX_RESULTS);
		results
	}

	fn rank(node: &TechNode, query: &str) -> Option<SearchResult> {
		let year = format_year(node.year, false);
		let result = |kind, text, subtext, score| SearchResult {
			kind,
			text,
			subtext: Some(subtext),
			score,
			node_id: Some(node.id.clone()),
			year: node.year,
		};

		let mut score = 0;
		if node.title.to_lowercase().contains(query) {
			score += 10;
		}
		if node.subtitle.as_ref().is_some_and(|s| s.to_lowercase().contains(query)) {
			score += 5;
		}
		if score > 0 {
			let subtext = match &node.subtitle {
				Some(subtitle) => format!("{year} – {subtitle}"),
				None => year,
			};
			return Some(result(SearchKind::Node, node.title.clone(), subtext, score));
		}

		let mentions = |names: &[String]| names.iter().any(|n| n.to_lowercase().contains(query));
		if mentions(&node.inventors) {
			let subtext = format!("Invented {} ({year})", node.title);
			return Some(result(SearchKind::Person, node.inventors.join(", "), subtext, 5));
		}
		if mentions(&node.organizations) {
			let subtext = format!("Developed {} ({year})", node.title);
			return Some(result(SearchKind::Organization, node.organizations.join(", "), subtext, 3));
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tech(id: &str, year: i32, title: &str) -> TechNode {
		TechNode {
			id: id.into(),
			year,
			title: title.into(),
			..Default::default()
		}
	}

	fn index() -> SearchIndex {
		SearchIndex::new(&[
			tech("wheel", -3500, "Wheel"),
			TechNode {
				subtitle: Some("Movable type press".into()),
				inventors: vec!["Johannes Gutenberg".into()],
				..tech("press", 1440, "Printing press")
			},
			TechNode {
				subtitle: Some("Press for olives".into()),
				..tech("olive", -200, "Screw")
			},
			TechNode {
				inventors: vec!["Thomas Edison".into()],
				organizations: vec!["Edison Electric Light Company".into()],
				fields: vec!["Electricity".into()],
				..tech("bulb", 1879, "Incandescent light bulb")
			},
			TechNode {
				organizations: vec!["Bell Labs".into()],
				..tech("transistor", 1947, "Transistor")
			},
		])
	}

	#[test]
	fn blank_queries_find_nothing() {
		assert!(index().search("").is_empty());
		assert!(index().search("   ").is_empty());
	}

	#[test]
	fn title_hits_outrank_subtitle_hits() {
		let results = index().search("press");
		let ids: Vec<_> = results.iter().filter_map(|r| r.node_id.as_deref()).collect();
		assert_eq!(ids, vec!["press", "olive"]);
		assert_eq!(results[0].score, 15);
		assert_eq!(results[0].subtext.as_deref(), Some("1440 – Movable type press"));
		assert_eq!(results[1].score, 5);
		assert_eq!(results[1].kind, SearchKind::Node);
	}

	#[test]
	fn every_term_must_match_somewhere() {
		let results = index().search("light electricity");
		assert!(results.is_empty(), "no title contains the whole query");
		assert!(index().search("wheel zebra").is_empty());
	}

	#[test]
	fn people_and_organizations_are_found() {
		let people = index().search("edison");
		assert_eq!(people.len(), 1);
		assert_eq!(people[0].kind, SearchKind::Person);
		assert_eq!(people[0].text, "Thomas Edison");
		assert_eq!(people[0].subtext.as_deref(), Some("Invented Incandescent light bulb (1879)"));

		let orgs = index().search("bell labs");
		assert_eq!(orgs[0].kind, SearchKind::Organization);
		assert_eq!(orgs[0].score, 3);
		assert_eq!(orgs[0].subtext.as_deref(), Some("Developed Transistor (1947)"));
	}

	#[test]
	fn years_inside_the_data_range_come_first() {
		let results = index().search("500 BC");
		assert_eq!(results[0].kind, SearchKind::Year);
		assert_eq!(results[0].year, -500);
		assert_eq!(results[0].text, "Go to year 500 BCE");

		assert_eq!(index().search("1879")[0].year, 1879);
		assert!(index().search("2500").is_empty());
		assert!(index().search("0").is_empty());
		assert_eq!(parse_year("-3000"), Some((-3000, false)));
		assert_eq!(parse_year("12bce"), Some((12, true)));
		assert_eq!(parse_year("bc"), None);
		assert_eq!(parse_year("19th"), None);
	}

	#[test]
	fn results_are_capped() {
		let nodes: Vec<TechNode> =
			(0..25).map(|i| tech(&i.to_string(), 1900 + i, &format!("Engine {i}"))).collect();
		let results = SearchIndex::new(&nodes).search("engine");
		assert_eq!(results.len(), MAX_RESULTS);
		assert_eq!(results[0].node_id.as_deref(), Some("0"));
	}
}
