//! Errors raised while loading the data set.
//!
//! The engine itself never fails; only fetching and caching do.

use thiserror::Error;

/// Failure to obtain or persist graph data.
#[derive(Debug, Error)]
pub enum DataError {
	/// The request never produced a response.
	#[error("request failed: {0}")]
	Http(String),

	/// The server answered with a non-success status.
	#[error("server answered {status} for {url}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},

	/// The body or the cached entry is not a graph document.
	#[error("invalid graph document: {0}")]
	Json(#[from] serde_json::Error),

	/// `localStorage` is missing or refused the operation.
	#[error("local storage unavailable: {0}")]
	Storage(String),
}

impl From<gloo_net::Error> for DataError {
	fn from(err: gloo_net::Error) -> Self {
		Self::Http(err.to_string())
	}
}

/// Result alias for the data layer.
pub type Result<T> = std::result::Result<T, DataError>;
