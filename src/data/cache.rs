use log::{debug, warn};
use serde::{Deserialize, Serialize};
use web_sys::Storage;

use super::types::GraphData;
use crate::config::CacheConfig;
use crate::error::{DataError, Result};

/// Envelope stored under the cache key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedData {
	/// Cache version the entry was written with.
	pub version: String,
	/// Milliseconds since the epoch at write time.
	pub timestamp: f64,
	/// The cached document.
	pub basic_data: GraphData,
}

impl CachedData {
	/// Usable when written by the same cache version no more than `ttl_ms` ago.
	pub fn is_fresh(&self, version: &str, now_ms: f64, ttl_ms: f64) -> bool {
		self.version == version && now_ms - self.timestamp <= ttl_ms
	}
}

/// Versioned, expiring copy of the graph document in browser local storage.
///
/// Failures are logged and treated as a miss; the cache never blocks loading.
#[derive(Clone, Debug, Default)]
pub struct LocalCache {
	config: CacheConfig,
}

impl LocalCache {
	/// Cache using the given key, version and TTL.
	pub fn new(config: CacheConfig) -> Self {
		Self { config }
	}

	/// The cached document, if present, current and unexpired. Stale entries
	/// are removed.
	pub fn get(&self) -> Option<GraphData> {
		match self.read() {
			Ok(data) => data,
			Err(err) => {
				warn!("Failed to retrieve cached data: {err}");
				None
			}
		}
	}

	/// Store `data` stamped with the current time.
	pub fn set(&self, data: &GraphData) {
		if let Err(err) = self.write(data) {
			warn!("Failed to cache data: {err}");
		}
	}

	fn read(&self) -> Result<Option<GraphData>> {
		let storage = storage()?;
		let Some(raw) = storage
			.get_item(&self.config.key)
			.map_err(|err| DataError::Storage(format!("{err:?}")))?
		else {
			return Ok(None);
		};

		let cached: CachedData = serde_json::from_str(&raw)?;
		if !cached.is_fresh(&self.config.version, js_sys::Date::now(), self.config.ttl_ms) {
			debug!("Discarding cache written by version {}", cached.version);
			storage
				.remove_item(&self.config.key)
				.map_err(|err| DataError::Storage(format!("{err:?}")))?;
			return Ok(None);
		}
		Ok(Some(cached.basic_data))
	}

	fn write(&self, data: &GraphData) -> Result<()> {
		let envelope = CachedData {
			version: self.config.version.clone(),
			timestamp: js_sys::Date::now(),
			basic_data: data.clone(),
		};
		let raw = serde_json::to_string(&envelope)?;
		storage()?
			.set_item(&self.config.key, &raw)
			.map_err(|err| DataError::Storage(format!("{err:?}")))
	}
}

fn storage() -> Result<Storage> {
	web_sys::window()
		.ok_or_else(|| DataError::Storage("no window".into()))?
		.local_storage()
		.map_err(|err| DataError::Storage(format!("{err:?}")))?
		.ok_or_else(|| DataError::Storage("local storage disabled".into()))
}
