//! Separable isotropic Gaussian smoothing over a grid.
use crate::grid::Grid;

/// Gaussian blur with standard deviation `sigma`, clamp-to-edge borders.
///
/// The kernel is truncated at 3σ and renormalized; `sigma <= 0` returns the
/// input unchanged. Horizontal and vertical passes accumulate in f64.
pub fn gaussian_blur(grid: &Grid, sigma: f32) -> Grid {
    if sigma <= 0.0 || grid.data.is_empty() {
        return grid.clone();
    }
    let kernel = gaussian_kernel(sigma as f64);
    let half = (kernel.len() / 2) as isize;
    let width = grid.width;
    let height = grid.height;

    // Horizontal pass.
    let mut tmp = vec![0.0f32; width * height];
    for r in 0..height {
        for c in 0..width {
            let mut sum = 0.0f64;
            for (k, &w) in kernel.iter().enumerate() {
                let cc = (c as isize + k as isize - half).clamp(0, width as isize - 1);
                sum += w * grid.get(r, cc as usize) as f64;
            }
            tmp[r * width + c] = sum as f32;
        }
    }

    // Vertical pass.
    let mut out = vec![0.0f32; width * height];
    for r in 0..height {
        for c in 0..width {
            let mut sum = 0.0f64;
            for (k, &w) in kernel.iter().enumerate() {
                let rr = (r as isize + k as isize - half).clamp(0, height as isize - 1);
                sum += w * tmp[rr as usize * width + c] as f64;
            }
            out[r * width + c] = sum as f32;
        }
    }

    Grid {
        data: out,
        width,
        height,
    }
}

/// Normalized 1-D Gaussian weights truncated at 3σ (radius ≥ 1).
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = ((sigma * 3.0).ceil() as isize).max(1);
    let mut weights = Vec::with_capacity((2 * radius + 1) as usize);
    for i in -radius..=radius {
        let x = i as f64 / sigma;
        weights.push((-0.5 * x * x).exp());
    }
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}
