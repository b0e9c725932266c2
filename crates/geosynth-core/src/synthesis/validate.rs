//! Pure spec validation.
//!
//! Runs before any array is allocated or any randomness is drawn, so invalid
//! configuration never costs computation. Validation is a pure function from
//! spec to pass/typed-failure; nothing here is recovered internally.
use thiserror::Error;

use super::spec::{ConstraintSpec, Domain, LatentFieldSpec, SynthesisSpec};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SpecError {
    #[error("{name}={value} is outside allowed range [{low}, {high}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        low: f32,
        high: f32,
    },
    #[error("spatial_scale must be > 0, got {0}")]
    NonPositiveScale(f32),
    #[error("calibration percentile must lie strictly inside (0, 100), got {0}")]
    PercentileOutOfRange(f32),
    #[error("value_range must satisfy low < high, got ({0}, {1})")]
    MalformedValueRange(f32, f32),
    #[error("smoothness_kernel_size must be a positive odd integer, got {0}")]
    InvalidKernelSize(u32),
    #[error("smoothness_kernel_size must be >= 3 when smoothing is enforced, got {0}")]
    KernelTooSmall(u32),
    #[error("bias_weight must be >= 0, got {0}")]
    NegativeBiasWeight(f32),
    #[error("spectral octaves must be >= 1")]
    ZeroOctaves,
    #[error("unknown noise family '{0}' (expected gaussian, perlin, or spectral)")]
    UnknownNoiseFamily(String),
    #[error("unknown domain '{0}' (expected flood, road, or urban)")]
    UnknownDomain(String),
}

pub fn validate_synthesis_spec(spec: &SynthesisSpec, domain: Domain) -> Result<(), SpecError> {
    let (low, high) = domain.strength_bounds();
    let s = spec.perturbation_strength;
    if !(s >= low && s <= high) {
        return Err(SpecError::OutOfRange {
            name: "perturbation_strength",
            value: s,
            low,
            high,
        });
    }
    if !(spec.spatial_scale > 0.0) {
        return Err(SpecError::NonPositiveScale(spec.spatial_scale));
    }
    let p = spec.calibration_percentile;
    if !(p > 0.0 && p < 100.0) {
        return Err(SpecError::PercentileOutOfRange(p));
    }
    let (vlow, vhigh) = spec.value_range;
    if !(vlow < vhigh) {
        return Err(SpecError::MalformedValueRange(vlow, vhigh));
    }
    Ok(())
}

pub fn validate_constraint_spec(constraints: &ConstraintSpec) -> Result<(), SpecError> {
    let k = constraints.smoothness_kernel_size;
    if k == 0 || k % 2 == 0 {
        return Err(SpecError::InvalidKernelSize(k));
    }
    if constraints.enforce_smoothness && k < 3 {
        return Err(SpecError::KernelTooSmall(k));
    }
    if !(constraints.bias_weight >= 0.0) {
        return Err(SpecError::NegativeBiasWeight(constraints.bias_weight));
    }
    Ok(())
}

pub fn validate_latent_spec(latent: &LatentFieldSpec) -> Result<(), SpecError> {
    // The noise-family tag itself is checked at the string boundary; the
    // enum makes an unrecognized family unrepresentable here.
    if latent.octaves == 0 {
        return Err(SpecError::ZeroOctaves);
    }
    Ok(())
}

/// Validate the full spec bundle for one pipeline run.
pub fn validate_specs(
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent: &LatentFieldSpec,
    domain: Domain,
) -> Result<(), SpecError> {
    validate_synthesis_spec(spec, domain)?;
    validate_constraint_spec(constraints)?;
    validate_latent_spec(latent)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(domain: Domain) -> (SynthesisSpec, ConstraintSpec, LatentFieldSpec) {
        (
            domain.default_spec(),
            domain.default_constraints(),
            domain.default_latent_spec(),
        )
    }

    #[test]
    fn documented_defaults_pass_for_every_domain() {
        for domain in [Domain::Flood, Domain::Road, Domain::Urban] {
            let (spec, constraints, latent) = defaults(domain);
            assert_eq!(
                validate_specs(&spec, &constraints, &latent, domain),
                Ok(()),
                "{} defaults must validate",
                domain.name()
            );
        }
    }

    #[test]
    fn negative_perturbation_strength_is_rejected() {
        let mut spec = Domain::Flood.default_spec();
        spec.perturbation_strength = -0.1;
        assert!(matches!(
            validate_synthesis_spec(&spec, Domain::Flood),
            Err(SpecError::OutOfRange { name: "perturbation_strength", .. })
        ));
    }

    #[test]
    fn road_strength_below_domain_floor_is_rejected() {
        let mut spec = Domain::Road.default_spec();
        spec.perturbation_strength = 0.005;
        assert!(validate_synthesis_spec(&spec, Domain::Road).is_err());
    }

    #[test]
    fn zero_spatial_scale_is_rejected() {
        let mut spec = Domain::Flood.default_spec();
        spec.spatial_scale = 0.0;
        assert_eq!(
            validate_synthesis_spec(&spec, Domain::Flood),
            Err(SpecError::NonPositiveScale(0.0))
        );
    }

    #[test]
    fn percentile_150_is_rejected() {
        let mut spec = Domain::Flood.default_spec();
        spec.calibration_percentile = 150.0;
        assert_eq!(
            validate_synthesis_spec(&spec, Domain::Flood),
            Err(SpecError::PercentileOutOfRange(150.0))
        );
    }

    #[test]
    fn inverted_value_range_is_rejected() {
        let mut spec = Domain::Flood.default_spec();
        spec.value_range = (1.0, 0.0);
        assert_eq!(
            validate_synthesis_spec(&spec, Domain::Flood),
            Err(SpecError::MalformedValueRange(1.0, 0.0))
        );
    }

    #[test]
    fn even_kernel_size_is_rejected_when_smoothing_enforced() {
        let mut constraints = Domain::Flood.default_constraints();
        constraints.smoothness_kernel_size = 4;
        assert_eq!(
            validate_constraint_spec(&constraints),
            Err(SpecError::InvalidKernelSize(4))
        );
    }

    #[test]
    fn kernel_size_one_is_too_small_with_smoothing() {
        let mut constraints = Domain::Flood.default_constraints();
        constraints.smoothness_kernel_size = 1;
        assert_eq!(
            validate_constraint_spec(&constraints),
            Err(SpecError::KernelTooSmall(1))
        );
        constraints.enforce_smoothness = false;
        assert_eq!(validate_constraint_spec(&constraints), Ok(()));
    }

    #[test]
    fn zero_octaves_rejected() {
        let mut latent = Domain::Road.default_latent_spec();
        latent.octaves = 0;
        assert_eq!(validate_latent_spec(&latent), Err(SpecError::ZeroOctaves));
    }
}
