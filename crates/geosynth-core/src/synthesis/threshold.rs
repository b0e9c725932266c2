//! Binary label mapping from calibrated continuous fields.
use crate::grid::{Grid, LabelGrid};

use super::calibration::percentile;

/// Fixed-cutoff binarization; the comparison is inclusive (`>=`).
pub fn threshold(field: &Grid, cutoff: f32) -> LabelGrid {
    let data = field.data.iter().map(|&v| u8::from(v >= cutoff)).collect();
    LabelGrid {
        data,
        width: field.width,
        height: field.height,
    }
}

/// Percentile-derived cutoff, computed fresh from the input field.
pub fn percentile_threshold(field: &Grid, pct: f32) -> LabelGrid {
    threshold(field, percentile(&field.data, pct))
}
