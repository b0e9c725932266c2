//! Immutable parameter records governing one synthesis run.
//!
//! Specs are constructed from the per-domain default factories or from
//! external configuration, validated once at pipeline entry, and passed by
//! value through the pipeline — never mutated.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validate::SpecError;

/// Hazard domain. Selects the bias term, the feature stack, and the
/// documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Flood,
    Road,
    Urban,
}

/// Base-noise family for latent field generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseFamily {
    /// Independent standard-normal draws, smoothed afterwards.
    Gaussian,
    /// Single-octave Perlin sampled at the spec's spatial scale.
    Perlin,
    /// Multi-octave fBm at the spec's spatial scale.
    Spectral,
}

/// Parameters of one synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisSpec {
    /// Magnitude of latent variation. Allowed range is domain-specific.
    pub perturbation_strength: f32,
    /// Characteristic length scale of perturbations, in cells.
    pub spatial_scale: f32,
    /// Base seed; sample `i` draws with `seed + i`. None = entropy-seeded.
    pub seed: Option<u64>,
    /// Percentile (0–100, exclusive) mapped to the top of `value_range`.
    pub calibration_percentile: f32,
    /// Enforced output bounds (low, high).
    pub value_range: (f32, f32),
}

/// Structural constraints applied between latent generation and calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// Clip the constrained field to [0, 1].
    pub enforce_bounds: bool,
    /// Apply the domain bias term before smoothing.
    pub enforce_bias: bool,
    /// Apply Gaussian smoothing after the bias term.
    pub enforce_smoothness: bool,
    /// Smoothing sigma in cells; must be odd, and ≥ 3 when smoothing is
    /// enforced.
    pub smoothness_kernel_size: u32,
    /// Strength of the additive bias term relative to the latent field.
    pub bias_weight: f32,
}

/// Noise-generation policy for the latent field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatentFieldSpec {
    pub noise_family: NoiseFamily,
    /// Min-max rescale the latent field to [0, 1] after generation.
    pub normalize: bool,
    /// Octave count for the spectral family; ignored by the others.
    pub octaves: u32,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Flood => "flood",
            Domain::Road => "road",
            Domain::Urban => "urban",
        }
    }

    /// Documented default synthesis parameters.
    pub fn default_spec(self) -> SynthesisSpec {
        match self {
            Domain::Flood => SynthesisSpec {
                perturbation_strength: 0.15,
                spatial_scale: 30.0,
                seed: None,
                calibration_percentile: 90.0,
                value_range: (0.0, 1.0),
            },
            Domain::Road => SynthesisSpec {
                perturbation_strength: 0.12,
                spatial_scale: 20.0,
                seed: None,
                calibration_percentile: 85.0,
                value_range: (0.0, 1.0),
            },
            Domain::Urban => SynthesisSpec {
                perturbation_strength: 0.18,
                spatial_scale: 25.0,
                seed: None,
                calibration_percentile: 80.0,
                value_range: (0.0, 1.0),
            },
        }
    }

    /// Documented default constraint set.
    pub fn default_constraints(self) -> ConstraintSpec {
        let smoothness_kernel_size = match self {
            Domain::Flood | Domain::Road => 5,
            Domain::Urban => 7,
        };
        ConstraintSpec {
            enforce_bounds: true,
            enforce_bias: true,
            enforce_smoothness: true,
            smoothness_kernel_size,
            bias_weight: 1.0,
        }
    }

    /// Documented default latent-field policy.
    pub fn default_latent_spec(self) -> LatentFieldSpec {
        let noise_family = match self {
            Domain::Flood => NoiseFamily::Gaussian,
            Domain::Road | Domain::Urban => NoiseFamily::Spectral,
        };
        LatentFieldSpec {
            noise_family,
            normalize: true,
            octaves: 4,
        }
    }

    /// Allowed perturbation-strength interval.
    pub(crate) fn strength_bounds(self) -> (f32, f32) {
        match self {
            Domain::Flood => (0.0, 1.0),
            Domain::Road | Domain::Urban => (0.01, 0.5),
        }
    }
}

impl FromStr for Domain {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, SpecError> {
        match s {
            "flood" => Ok(Domain::Flood),
            "road" => Ok(Domain::Road),
            "urban" => Ok(Domain::Urban),
            other => Err(SpecError::UnknownDomain(other.to_string())),
        }
    }
}

impl FromStr for NoiseFamily {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, SpecError> {
        match s {
            "gaussian" => Ok(NoiseFamily::Gaussian),
            "perlin" => Ok(NoiseFamily::Perlin),
            "spectral" => Ok(NoiseFamily::Spectral),
            other => Err(SpecError::UnknownNoiseFamily(other.to_string())),
        }
    }
}
