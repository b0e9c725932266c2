//! Terrain-derived feature stacks consumed by the synthesis pipelines.
pub mod features;
pub mod gradient;

pub use features::{flood_features, surface_features, FloodFeatures, SurfaceFeatures};
pub use gradient::{normalize_unit, sobel_magnitude};
