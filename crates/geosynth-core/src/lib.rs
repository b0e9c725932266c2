//! Synthetic hazard/susceptibility raster engine.
//!
//! Derives flood, road-connectivity, and urban-density label rasters from a
//! terrain elevation grid: D8 flow routing and upstream accumulation provide
//! the hydrological feature channels, and a spec-validated constrained
//! synthesis pipeline (latent field → domain constraints → percentile
//! calibration → thresholding) produces the label surfaces. All outputs are
//! explicitly synthetic training labels, not calibrated predictions.

pub mod evaluation;
pub mod grid;
pub mod hydrology;
pub mod synthesis;
pub mod terrain;
pub mod tiling;
