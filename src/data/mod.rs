//! Graph documents: wire types, validation, filtering, search, caching and
//! fetching.

mod cache;
mod fetch;
mod filter;
mod ingest;
mod sample;
mod search;
mod types;

pub use cache::{CachedData, LocalCache};
pub use fetch::{DATA_URL, fetch_graph};
pub use filter::NodeFilter;
pub use ingest::{ValidatedGraph, validate};
pub use sample::sample_graph;
pub use search::{MAX_RESULTS, SearchIndex, SearchKind, SearchResult};
pub use types::{ConnectionType, GraphData, LinkRecord, NodeRecord, TechLink, TechNode};
