//! Per-domain feature stacks: flood (4 channels) and surface (3 channels),
//! every channel normalized to [0, 1].
use crate::grid::Grid;
use crate::hydrology::{flow_accumulation, flow_direction};

use super::gradient::{normalize_unit, sobel_magnitude};

// Base-risk blend weights: flow accumulation dominates elevation and slope.
const W_ELEV: f64 = 1.0;
const W_SLOPE: f64 = 1.0;
const W_ACC: f64 = 1.5;

/// Channels consumed by the flood synthesis pipeline.
#[derive(Debug, Clone)]
pub struct FloodFeatures {
    pub elevation: Grid,
    pub slope: Grid,
    pub flow_accumulation: Grid,
    /// Continuous base-risk proxy blended from the other three channels.
    pub base_risk: Grid,
}

/// Channels shared by the road and urban pipelines. The road domain reads
/// the gradient channel as terrain ruggedness, the urban domain as edge
/// density; flatness is its complement either way.
#[derive(Debug, Clone)]
pub struct SurfaceFeatures {
    pub elevation: Grid,
    pub gradient: Grid,
    pub flatness: Grid,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Weighted logistic blend of the terrain drivers: low ground, gentle slope,
/// and high upstream accumulation all raise the score.
pub fn base_flood_risk(elevation: &Grid, slope: &Grid, flow_acc: &Grid) -> Grid {
    let data = elevation
        .data
        .iter()
        .zip(&slope.data)
        .zip(&flow_acc.data)
        .map(|((&e, &s), &a)| {
            let score = W_ELEV * (1.0 - e as f64)
                + W_SLOPE * (1.0 - s as f64)
                + W_ACC * a as f64;
            sigmoid(score) as f32
        })
        .collect();
    Grid {
        data,
        width: elevation.width,
        height: elevation.height,
    }
}

/// Derive the 4-channel flood feature stack from a raw elevation grid.
pub fn flood_features(dem: &Grid) -> FloodFeatures {
    let elevation = normalize_unit(dem);
    let slope = normalize_unit(&sobel_magnitude(dem));
    let directions = flow_direction(dem);
    let acc = normalize_unit(&flow_accumulation(&directions));
    let base_risk = base_flood_risk(&elevation, &slope, &acc);
    FloodFeatures {
        elevation,
        slope,
        flow_accumulation: acc,
        base_risk,
    }
}

/// Derive the 3-channel surface feature stack from a raw elevation grid.
pub fn surface_features(dem: &Grid) -> SurfaceFeatures {
    let elevation = normalize_unit(dem);
    let gradient = normalize_unit(&sobel_magnitude(dem));
    let flatness = Grid {
        data: gradient.data.iter().map(|&g| 1.0 - g).collect(),
        width: gradient.width,
        height: gradient.height,
    };
    SurfaceFeatures {
        elevation,
        gradient,
        flatness,
    }
}
