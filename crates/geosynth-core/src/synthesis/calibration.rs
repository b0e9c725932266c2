//! Percentile calibration: rescale a constrained field so the configured
//! percentile maps to the top of the output range.
use crate::grid::Grid;

/// Guard against division by a near-zero percentile value.
const PERCENTILE_EPS: f32 = 1e-8;

/// Value at `pct` (0–100) with linear interpolation between closest ranks.
pub fn percentile(values: &[f32], pct: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (pct.clamp(0.0, 100.0) as f64 / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = rank - lo as f64;
    (sorted[lo] as f64 * (1.0 - t) + sorted[hi] as f64 * t) as f32
}

/// Divide the field by its `pct` percentile value (epsilon-guarded) and clip
/// to `value_range`. Absent clipping, the configured percentile of the
/// output is exactly 1.0, giving every sample a comparable high-risk
/// reference point regardless of the raw field's scale.
pub fn calibrate(field: &Grid, pct: f32, value_range: (f32, f32)) -> Grid {
    let p = percentile(&field.data, pct);
    let (low, high) = value_range;
    let data = field
        .data
        .iter()
        .map(|&v| (v / (p + PERCENTILE_EPS)).max(low).min(high))
        .collect();
    Grid {
        data,
        width: field.width,
        height: field.height,
    }
}
