//! Comparison statistics between real and synthetic rasters.
//!
//! Sanity-check metrics consumed by reporting tools: these read generated
//! fields but never shape them.
use serde::Serialize;
use thiserror::Error;

use crate::grid::{Grid, LabelGrid};
use crate::synthesis::calibration::percentile;

const EPS: f64 = 1e-8;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("rasters must share a shape: {0}x{1} vs {2}x{3}")]
    ShapeMismatch(usize, usize, usize, usize),
}

/// Basic distribution statistics of one raster.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub std: f32,
    pub p90: f32,
    pub p95: f32,
}

/// Summarize the value distribution of `field`.
pub fn summarize(field: &Grid) -> DistributionSummary {
    let n = field.data.len().max(1) as f64;
    let mean = field.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = field
        .data
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    DistributionSummary {
        min: field.min_value(),
        max: field.max_value(),
        mean: mean as f32,
        std: var.sqrt() as f32,
        p90: percentile(&field.data, 90.0),
        p95: percentile(&field.data, 95.0),
    }
}

/// Side-by-side distribution comparison of a real and a synthetic raster.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionComparison {
    pub real: DistributionSummary,
    pub synthetic: DistributionSummary,
    pub mean_shift: f32,
    pub std_ratio: f32,
}

pub fn compare_distributions(real: &Grid, synthetic: &Grid) -> DistributionComparison {
    let r = summarize(real);
    let s = summarize(synthetic);
    let mean_shift = s.mean - r.mean;
    let std_ratio = (s.std as f64 / (r.std as f64 + EPS)) as f32;
    DistributionComparison {
        real: r,
        synthetic: s,
        mean_shift,
        std_ratio,
    }
}

/// Pearson correlation between two rasters of identical shape.
/// Zero-variance inputs yield 0.0 rather than failing.
pub fn spatial_correlation(real: &Grid, synthetic: &Grid) -> Result<f32, EvalError> {
    if !real.same_shape(synthetic) {
        return Err(EvalError::ShapeMismatch(
            real.width,
            real.height,
            synthetic.width,
            synthetic.height,
        ));
    }
    let n = real.data.len() as f64;
    if n == 0.0 {
        return Ok(0.0);
    }
    let mean_r = real.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_s = synthetic.data.iter().map(|&v| v as f64).sum::<f64>() / n;

    let mut cov = 0.0f64;
    let mut var_r = 0.0f64;
    let mut var_s = 0.0f64;
    for (&a, &b) in real.data.iter().zip(&synthetic.data) {
        let da = a as f64 - mean_r;
        let db = b as f64 - mean_s;
        cov += da * db;
        var_r += da * da;
        var_s += db * db;
    }
    let denom = (var_r * var_s).sqrt();
    if denom < EPS {
        return Ok(0.0);
    }
    Ok((cov / denom) as f32)
}

/// Ratio of labelled area, synthetic over real; values near 1.0 indicate a
/// balanced label budget.
pub fn labelled_area_ratio(real: &LabelGrid, synthetic: &LabelGrid) -> f32 {
    let real_area = real.positive_cells() as f64;
    let synth_area = synthetic.positive_cells() as f64;
    (synth_area / (real_area + EPS)) as f32
}
