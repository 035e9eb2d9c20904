//! Tunables for layout, culling, the minimap and the data cache.
//!
//! Every struct has a `Default` matching the production look; tests and callers
//! override individual fields with struct update syntax.

use crate::engine::spatial_index::DEFAULT_CELL_SIZE;

// ============================================================================
// Constants
// ============================================================================

/// Horizontal distance between two consecutive distinct years.
pub const YEAR_WIDTH: f64 = 140.0;

/// Left margin before the earliest year, also the trailing margin.
pub const PADDING: f64 = 120.0;

/// Vertical baseline same-year groups are centred on.
pub const BASE_Y: f64 = 600.0;

/// Vertical distance between members of a same-year group.
pub const VERTICAL_SPACING: f64 = 160.0;

/// Prefetch margin around the strict viewport, in layout units.
pub const VIEWPORT_BUFFER: f64 = 350.0;

/// Grid cell size used by a session's index.
pub const INDEX_CELL_SIZE: f64 = DEFAULT_CELL_SIZE;

/// Containers narrower than this use the compressed minimap.
pub const SMALL_SCREEN_WIDTH_THRESHOLD: f64 = 640.0;

/// Storage key of the cached data set.
pub const CACHE_KEY: &str = "tech-tree-cache";

/// Bump to invalidate every cached data set.
pub const CACHE_VERSION: &str = "1.0";

// ============================================================================
// Structs
// ============================================================================

/// Year-to-position mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
	/// See [`YEAR_WIDTH`].
	pub year_width: f64,
	/// See [`PADDING`].
	pub padding: f64,
	/// See [`BASE_Y`].
	pub base_y: f64,
	/// See [`VERTICAL_SPACING`].
	pub vertical_spacing: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			year_width: YEAR_WIDTH,
			padding: PADDING,
			base_y: BASE_Y,
			vertical_spacing: VERTICAL_SPACING,
		}
	}
}

/// Culling behaviour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityConfig {
	/// Margin added on every side of the strict viewport.
	pub buffer: f64,
	/// Edge length of a spatial index cell.
	pub cell_size: f64,
}

impl Default for VisibilityConfig {
	fn default() -> Self {
		Self {
			buffer: VIEWPORT_BUFFER,
			cell_size: INDEX_CELL_SIZE,
		}
	}
}

/// Minimap box geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapConfig {
	/// Height of the drawable area holding node dots.
	pub content_height: f64,
	/// Height reserved above the content for year labels.
	pub label_height: f64,
	/// Containers narrower than this count as small screens.
	pub small_screen_threshold: f64,
	/// Vertical compression on small screens; 1.0 elsewhere.
	pub small_screen_vertical_scale: f64,
}

impl Default for MinimapConfig {
	fn default() -> Self {
		Self {
			content_height: 48.0,
			label_height: 10.0,
			small_screen_threshold: SMALL_SCREEN_WIDTH_THRESHOLD,
			small_screen_vertical_scale: 2.0,
		}
	}
}

impl MinimapConfig {
	/// Whether a container of `width` pixels counts as a small screen.
	pub fn is_small_screen(&self, width: f64) -> bool {
		width > 0.0 && width < self.small_screen_threshold
	}

	/// Vertical compression factor for a container of `width` pixels.
	pub fn vertical_scale(&self, width: f64) -> f64 {
		if self.is_small_screen(width) {
			self.small_screen_vertical_scale
		} else {
			1.0
		}
	}

	/// Total minimap height including the label strip.
	pub fn total_height(&self, width: f64) -> f64 {
		if self.is_small_screen(width) {
			96.0
		} else {
			self.content_height + self.label_height + 6.0
		}
	}
}

/// Local storage cache envelope settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheConfig {
	/// `localStorage` key.
	pub key: String,
	/// Entries written with another version are discarded on read.
	pub version: String,
	/// Entries older than this are discarded on read.
	pub ttl_ms: f64,
}

impl Default for CacheConfig {
	fn default() -> Self {
		let ttl_ms = if cfg!(debug_assertions) {
			5.0 * 60.0 * 1000.0
		} else {
			24.0 * 60.0 * 60.0 * 1000.0
		};
		Self {
			key: CACHE_KEY.to_owned(),
			version: CACHE_VERSION.to_owned(),
			ttl_ms,
		}
	}
}

/// Everything a visualization session needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeConfig {
	/// Node placement.
	pub layout: LayoutConfig,
	/// Culling.
	pub visibility: VisibilityConfig,
	/// Minimap strip.
	pub minimap: MinimapConfig,
	/// Data set cache.
	pub cache: CacheConfig,
}
