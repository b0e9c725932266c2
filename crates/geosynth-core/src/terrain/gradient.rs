//! Sobel gradient magnitude and min-max normalization.
use crate::grid::Grid;

/// Denominator guard for zero-dynamic-range inputs.
pub(crate) const RANGE_EPS: f32 = 1e-8;

/// Min-max rescale to [0, 1]. A flat input collapses to all zeros rather
/// than failing: the denominator is epsilon-guarded.
pub fn normalize_unit(grid: &Grid) -> Grid {
    let min = grid.min_value();
    let range = grid.max_value() - min;
    let data = grid
        .data
        .iter()
        .map(|&v| (v - min) / (range + RANGE_EPS))
        .collect();
    Grid {
        data,
        width: grid.width,
        height: grid.height,
    }
}

/// 3×3 Sobel gradient magnitude with clamp-to-edge borders.
///
/// ```text
///   Gx = (NE + 2·E + SE) − (NW + 2·W + SW)
///   Gy = (SW + 2·S + SE) − (NW + 2·N + NE)
///   magnitude = √(Gx² + Gy²)
/// ```
pub fn sobel_magnitude(dem: &Grid) -> Grid {
    let width = dem.width;
    let height = dem.height;
    let mut out = Grid::zeros(width, height);

    for r in 0..height {
        for c in 0..width {
            let at = |dr: isize, dc: isize| -> f64 {
                let rr = (r as isize + dr).clamp(0, height as isize - 1) as usize;
                let cc = (c as isize + dc).clamp(0, width as isize - 1) as usize;
                dem.get(rr, cc) as f64
            };
            let gx = (at(-1, 1) + 2.0 * at(0, 1) + at(1, 1))
                - (at(-1, -1) + 2.0 * at(0, -1) + at(1, -1));
            let gy = (at(1, -1) + 2.0 * at(1, 0) + at(1, 1))
                - (at(-1, -1) + 2.0 * at(-1, 0) + at(-1, 1));
            out.set(r, c, gx.hypot(gy) as f32);
        }
    }

    out
}
