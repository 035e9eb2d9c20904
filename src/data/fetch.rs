use gloo_net::http::Request;
use log::info;

use super::types::GraphData;
use crate::error::{DataError, Result};

/// Endpoint serving the `{nodes, links}` document.
pub const DATA_URL: &str = "/api/inventions";

/// Download and decode the graph document.
pub async fn fetch_graph(url: &str) -> Result<GraphData> {
	let response = Request::get(url).send().await?;
	if !response.ok() {
		return Err(DataError::Status {
			url: url.to_owned(),
			status: response.status(),
		});
	}
	let text = response.text().await?;
	let data: GraphData = serde_json::from_str(&text)?;
	info!(
		"Fetched {} nodes and {} links from {url}",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}
