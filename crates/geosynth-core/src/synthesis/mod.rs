//! Spec-validated constrained synthesis: latent stochastic field → domain
//! physical constraints → percentile calibration → optional thresholding.
//! One generic pipeline, replicated across the flood, road, and urban
//! domains by a small per-domain policy (bias term, feature stack,
//! defaults). No stage retries: every failure is deterministic and reported
//! once.
pub mod calibration;
pub mod constraints;
pub mod latent;
pub mod pipeline;
pub mod smoothing;
pub mod spec;
pub mod threshold;
pub mod validate;

pub use calibration::{calibrate, percentile};
pub use constraints::{apply_constraints, BiasTerm};
pub use latent::latent_field;
pub use pipeline::{
    synthesize_flood_labels, synthesize_flood_risk, synthesize_road_connectivity,
    synthesize_road_labels, synthesize_urban_density, synthesize_urban_labels, LabelCutoff,
    SynthesisError,
};
pub use smoothing::gaussian_blur;
pub use spec::{ConstraintSpec, Domain, LatentFieldSpec, NoiseFamily, SynthesisSpec};
pub use threshold::{percentile_threshold, threshold};
pub use validate::{validate_specs, SpecError};
