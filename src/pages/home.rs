use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::components::tech_tree::TechTreeCanvas;
use crate::config::CacheConfig;
use crate::data::{DATA_URL, GraphData, LocalCache, NodeFilter, fetch_graph, sample_graph};

/// Where the currently displayed data set came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DataSource {
	Loading,
	Cache,
	Network,
	Sample,
}

impl DataSource {
	fn label(self) -> &'static str {
		match self {
			DataSource::Loading => "Loading inventions…",
			DataSource::Cache => "Loaded from cache",
			DataSource::Network => "Loaded from server",
			DataSource::Sample => "Server unavailable, showing sample data",
		}
	}
}

/// Cache first, then the API; the built-in sample if both fail.
async fn load_graph() -> (GraphData, DataSource) {
	let cache = LocalCache::new(CacheConfig::default());
	if let Some(data) = cache.get() {
		info!("Using cached data set");
		return (data, DataSource::Cache);
	}
	match fetch_graph(DATA_URL).await {
		Ok(data) => {
			cache.set(&data);
			(data, DataSource::Network)
		}
		Err(err) => {
			warn!("Failed to fetch data set: {err}");
			(sample_graph(), DataSource::Sample)
		}
	}
}

/// Full-window timeline with a status line.
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = RwSignal::new(GraphData::default());
	let source = RwSignal::new(DataSource::Loading);

	let query = use_query_map();
	let filter = Signal::derive(move || query.with(NodeFilter::from_params));
	let draft = RwSignal::new(String::new());
	let search = RwSignal::new(String::new());

	spawn_local(async move {
		let (data, from) = load_graph().await;
		graph_data.set(data);
		source.set(from);
	});

	view! {
		<div class="fullscreen-tree">
			<TechTreeCanvas data=graph_data filter=filter search=search />
			<div class="tree-overlay">
				<h1>"Tech Tree"</h1>
				<p class="subtitle">
					"Scroll to pan. Ctrl + scroll to zoom. Drag the minimap to jump. "
					"Click a card to select it; A and D show its ancestors and descendants."
				</p>
				<input
					class="tree-search"
					type="search"
					placeholder="Search inventions, people or years"
					prop:value=draft
					on:input=move |ev| draft.set(event_target_value(&ev))
					on:keydown=move |ev| {
						if ev.key() == "Enter" {
							search.set(draft.get_untracked());
						}
					}
				/>
				<p class="status">{move || source.get().label()}</p>
			</div>
		</div>
	}
}
