//! Layout, spatial indexing and culling. Pure, synchronous and DOM-free.

/// Screen and minimap transforms.
pub mod coords;
/// Connection curves.
pub mod curve;
/// Points, segments and rectangles.
pub mod geometry;
/// Year to position.
pub mod layout;
/// Selected node or connection.
pub mod selection;
/// One loaded data set.
pub mod session;
/// Grid spatial index.
pub mod spatial_index;
/// Viewport culling.
pub mod visibility;

pub use coords::{MinimapDrag, MinimapScale, ViewTransform};
pub use geometry::{Point, Segment, Viewport};
pub use selection::{DIMMED_OPACITY, Selection};
pub use session::TechTreeSession;
pub use spatial_index::SpatialIndex;
pub use visibility::{PinnedElements, ViewportInput, VisibleElements, VisibilityStats};
