use super::types::{ConnectionType, GraphData, LinkRecord, NodeRecord};

const TECHNOLOGIES: &[(&str, i32, &str)] = &[
	("Stone tool", -3300000, "Manufacturing"),
	("Fire", -400000, "Energy"),
	("Clothing", -170000, "Textiles"),
	("Bow and arrow", -64000, "Weaponry"),
	("Pottery", -18000, "Manufacturing"),
	("Agriculture", -10000, "Agriculture"),
	("Copper smelting", -5000, "Metallurgy"),
	("Wheel", -3500, "Transportation"),
	("Writing", -3200, "Communication"),
	("Bronze", -3000, "Metallurgy"),
	("Sail", -3000, "Sailing"),
	("Iron smelting", -1200, "Metallurgy"),
	("Alphabet", -1050, "Communication"),
	("Coinage", -600, "Finance"),
	("Water wheel", -300, "Energy"),
	("Paper", 105, "Communication"),
	("Compass", 1040, "Geography"),
	("Printing press", 1440, "Communication"),
	("Telescope", 1608, "Astronomy"),
	("Steam engine", 1712, "Energy"),
	("Spinning jenny", 1764, "Textiles"),
	("Battery", 1800, "Electricity"),
	("Telegraph", 1837, "Communication"),
	("Photography", 1839, "Visual media"),
	("Telephone", 1876, "Communication"),
	("Light bulb", 1879, "Lighting"),
	("Automobile", 1886, "Transportation"),
	("Radio", 1895, "Communication"),
	("Airplane", 1903, "Flying"),
	("Transistor", 1947, "Electronics"),
	("Integrated circuit", 1958, "Electronics"),
	("Internet", 1969, "Computing"),
];

const KINDS: [ConnectionType; 4] = [
	ConnectionType::Prerequisite,
	ConnectionType::Improvement,
	ConnectionType::Inspiration,
	ConnectionType::Component,
];

/// Deterministic pseudo-random value in `[0, 1)`.
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Built-in data set shown when neither the cache nor the API can provide one.
///
/// Every technology links back to a pseudo-randomly chosen earlier one.
pub fn sample_graph() -> GraphData {
	let nodes: Vec<NodeRecord> = TECHNOLOGIES
		.iter()
		.enumerate()
		.map(|(i, &(title, year, field))| NodeRecord {
			id: format!("tech-{i}"),
			title: title.to_owned(),
			year: Some(f64::from(year)),
			fields: vec![field.to_owned()],
			..Default::default()
		})
		.collect();

	let links = (1..nodes.len())
		.map(|i| {
			let source = (rand_simple(i) * i as f64) as usize;
			LinkRecord {
				source: nodes[source].id.clone(),
				target: nodes[i].id.clone(),
				kind: KINDS[i % KINDS.len()],
				details: None,
			}
		})
		.collect();

	GraphData { nodes, links }
}
