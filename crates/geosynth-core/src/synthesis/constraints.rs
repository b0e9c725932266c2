//! Domain physical constraints: bias, smoothing, bounds.
use crate::grid::Grid;

use super::smoothing::gaussian_blur;
use super::spec::ConstraintSpec;

/// Domain-specific bias term applied to the latent field.
#[derive(Debug, Clone, Copy)]
pub enum BiasTerm<'a> {
    /// Additive downhill bias: `field += weight * (1 - elevation)`.
    /// Lower ground floods more.
    Downhill { elevation: &'a Grid },
    /// Multiplicative flatness bias: `field *= flatness`.
    /// Linear/compact development favours flat terrain.
    Flatness { flatness: &'a Grid },
}

/// Reshape a latent field into a domain-plausible score surface.
///
/// Bias is applied before smoothing so the bias itself stays spatially
/// coherent in the output; bounds clipping always runs last.
pub fn apply_constraints(latent: &Grid, bias: BiasTerm, spec: &ConstraintSpec) -> Grid {
    let mut field = latent.clone();

    if spec.enforce_bias {
        match bias {
            BiasTerm::Downhill { elevation } => {
                for (v, &e) in field.data.iter_mut().zip(&elevation.data) {
                    *v += spec.bias_weight * (1.0 - e);
                }
            }
            BiasTerm::Flatness { flatness } => {
                for (v, &f) in field.data.iter_mut().zip(&flatness.data) {
                    *v *= f;
                }
            }
        }
    }

    if spec.enforce_smoothness {
        field = gaussian_blur(&field, spec.smoothness_kernel_size as f32);
    }

    if spec.enforce_bounds {
        for v in &mut field.data {
            *v = v.clamp(0.0, 1.0);
        }
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::spec::Domain;

    fn no_smoothing() -> ConstraintSpec {
        let mut spec = Domain::Flood.default_constraints();
        spec.enforce_smoothness = false;
        spec
    }

    #[test]
    fn downhill_bias_raises_low_ground_more() {
        let latent = Grid::new(4, 4, 0.2);
        let mut elevation = Grid::new(4, 4, 1.0);
        elevation.set(2, 2, 0.0); // one valley cell
        let out = apply_constraints(
            &latent,
            BiasTerm::Downhill { elevation: &elevation },
            &no_smoothing(),
        );
        assert!(out.get(2, 2) > out.get(0, 0));
        assert!((out.get(2, 2) - 1.0).abs() < 1e-6); // 0.2 + 1.0, clipped to 1
        assert!((out.get(0, 0) - 0.2).abs() < 1e-6); // weight * (1 - 1) adds nothing
    }

    #[test]
    fn flatness_bias_suppresses_steep_cells() {
        let latent = Grid::new(4, 4, 0.8);
        let mut flatness = Grid::new(4, 4, 1.0);
        flatness.set(1, 1, 0.0); // one cliff cell
        let out = apply_constraints(
            &latent,
            BiasTerm::Flatness { flatness: &flatness },
            &no_smoothing(),
        );
        assert_eq!(out.get(1, 1), 0.0);
        assert!((out.get(0, 0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn disabled_bias_leaves_field_untouched() {
        let latent = Grid::new(4, 4, 0.3);
        let flatness = Grid::new(4, 4, 0.0);
        let mut spec = no_smoothing();
        spec.enforce_bias = false;
        let out = apply_constraints(&latent, BiasTerm::Flatness { flatness: &flatness }, &spec);
        assert_eq!(out.data, latent.data);
    }

    #[test]
    fn bias_is_smoothed_into_the_output() {
        // With smoothing on, the sharp valley bias must leak into its
        // neighbourhood: bias is applied before the blur, not after.
        let latent = Grid::new(9, 9, 0.0);
        let mut elevation = Grid::new(9, 9, 1.0);
        elevation.set(4, 4, 0.0);
        let mut spec = Domain::Flood.default_constraints();
        spec.smoothness_kernel_size = 3;
        let out = apply_constraints(
            &latent,
            BiasTerm::Downhill { elevation: &elevation },
            &spec,
        );
        assert!(out.get(4, 4) < 1.0, "peak must be spread by the blur");
        assert!(out.get(4, 3) > 0.0, "neighbours must receive spread bias");
    }

    #[test]
    fn bounds_clip_to_unit_interval() {
        let latent = Grid::new(3, 3, 5.0);
        let elevation = Grid::new(3, 3, 0.0);
        let out = apply_constraints(
            &latent,
            BiasTerm::Downhill { elevation: &elevation },
            &no_smoothing(),
        );
        assert!(out.data.iter().all(|&v| v <= 1.0));
    }
}
