//! Per-domain synthesis orchestration.
//!
//! Each run validates every spec object once, rejects a bad sample count
//! before any work begins, then executes latent → constraints → calibration
//! per sample. Sample `i` draws with seed `base + i`, so results are
//! independent of execution order and identical whether samples run
//! sequentially or in parallel.
#[cfg(feature = "threading")]
use rayon::prelude::*;
use thiserror::Error;

use crate::grid::{Grid, LabelGrid};
use crate::terrain::{flood_features, surface_features};

use super::calibration::calibrate;
use super::constraints::{apply_constraints, BiasTerm};
use super::latent::latent_field;
use super::spec::{ConstraintSpec, Domain, LatentFieldSpec, SynthesisSpec};
use super::threshold::{percentile_threshold, threshold};
use super::validate::{validate_specs, SpecError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SynthesisError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("n_samples must be >= 1, got {0}")]
    InvalidSampleCount(usize),
}

/// How binary labels are cut from a calibrated field.
#[derive(Debug, Clone, Copy)]
pub enum LabelCutoff {
    /// Fixed-value cutoff (inclusive).
    Fixed(f32),
    /// Percentile-derived cutoff (0–100), computed fresh per field.
    Percentile(f32),
}

fn sample_seed(base: Option<u64>, index: usize) -> Option<u64> {
    base.map(|s| s + index as u64)
}

/// Run the latent → constraints → calibration chain for `n_samples` draws.
/// Specs must already be validated.
fn run_samples(
    width: usize,
    height: usize,
    bias: BiasTerm<'_>,
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent_spec: &LatentFieldSpec,
    n_samples: usize,
) -> Vec<Grid> {
    let draw = |i: usize| {
        let latent = latent_field(width, height, spec, latent_spec, sample_seed(spec.seed, i));
        let constrained = apply_constraints(&latent, bias, constraints);
        calibrate(&constrained, spec.calibration_percentile, spec.value_range)
    };

    #[cfg(feature = "threading")]
    return (0..n_samples).into_par_iter().map(draw).collect();

    #[cfg(not(feature = "threading"))]
    (0..n_samples).map(draw).collect()
}

fn check_sample_count(n_samples: usize) -> Result<(), SynthesisError> {
    if n_samples == 0 {
        return Err(SynthesisError::InvalidSampleCount(n_samples));
    }
    Ok(())
}

/// Generate `n_samples` calibrated flood-susceptibility fields from a raw
/// elevation grid.
pub fn synthesize_flood_risk(
    dem: &Grid,
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent_spec: &LatentFieldSpec,
    n_samples: usize,
) -> Result<Vec<Grid>, SynthesisError> {
    validate_specs(spec, constraints, latent_spec, Domain::Flood)?;
    check_sample_count(n_samples)?;
    let features = flood_features(dem);
    Ok(run_samples(
        dem.width,
        dem.height,
        BiasTerm::Downhill {
            elevation: &features.elevation,
        },
        spec,
        constraints,
        latent_spec,
        n_samples,
    ))
}

/// Generate `n_samples` calibrated road-connectivity fields.
pub fn synthesize_road_connectivity(
    dem: &Grid,
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent_spec: &LatentFieldSpec,
    n_samples: usize,
) -> Result<Vec<Grid>, SynthesisError> {
    validate_specs(spec, constraints, latent_spec, Domain::Road)?;
    check_sample_count(n_samples)?;
    let features = surface_features(dem);
    Ok(run_samples(
        dem.width,
        dem.height,
        BiasTerm::Flatness {
            flatness: &features.flatness,
        },
        spec,
        constraints,
        latent_spec,
        n_samples,
    ))
}

/// Generate `n_samples` calibrated urban-density fields.
pub fn synthesize_urban_density(
    dem: &Grid,
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent_spec: &LatentFieldSpec,
    n_samples: usize,
) -> Result<Vec<Grid>, SynthesisError> {
    validate_specs(spec, constraints, latent_spec, Domain::Urban)?;
    check_sample_count(n_samples)?;
    let features = surface_features(dem);
    Ok(run_samples(
        dem.width,
        dem.height,
        BiasTerm::Flatness {
            flatness: &features.flatness,
        },
        spec,
        constraints,
        latent_spec,
        n_samples,
    ))
}

fn cut_labels(fields: &[Grid], cutoff: LabelCutoff) -> Vec<LabelGrid> {
    fields
        .iter()
        .map(|f| match cutoff {
            LabelCutoff::Fixed(t) => threshold(f, t),
            LabelCutoff::Percentile(p) => percentile_threshold(f, p),
        })
        .collect()
}

/// Binary flood labels: the continuous pipeline followed by thresholding.
pub fn synthesize_flood_labels(
    dem: &Grid,
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent_spec: &LatentFieldSpec,
    n_samples: usize,
    cutoff: LabelCutoff,
) -> Result<Vec<LabelGrid>, SynthesisError> {
    let fields = synthesize_flood_risk(dem, spec, constraints, latent_spec, n_samples)?;
    Ok(cut_labels(&fields, cutoff))
}

/// Binary road labels.
pub fn synthesize_road_labels(
    dem: &Grid,
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent_spec: &LatentFieldSpec,
    n_samples: usize,
    cutoff: LabelCutoff,
) -> Result<Vec<LabelGrid>, SynthesisError> {
    let fields = synthesize_road_connectivity(dem, spec, constraints, latent_spec, n_samples)?;
    Ok(cut_labels(&fields, cutoff))
}

/// Binary urban labels.
pub fn synthesize_urban_labels(
    dem: &Grid,
    spec: &SynthesisSpec,
    constraints: &ConstraintSpec,
    latent_spec: &LatentFieldSpec,
    n_samples: usize,
    cutoff: LabelCutoff,
) -> Result<Vec<LabelGrid>, SynthesisError> {
    let fields = synthesize_urban_density(dem, spec, constraints, latent_spec, n_samples)?;
    Ok(cut_labels(&fields, cutoff))
}
