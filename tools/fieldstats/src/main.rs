/// Raster comparison tool: distribution summary, spatial correlation, and
/// labelled-area ratio between a real and a synthetic raster.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;

use geosynth_core::evaluation::{
    compare_distributions, labelled_area_ratio, spatial_correlation, DistributionComparison,
};
use geosynth_core::grid::{Grid, LabelGrid};

#[derive(Parser, Debug)]
#[command(
    name = "fieldstats",
    about = "Compare a real and a synthetic raster (distributions, correlation, area ratio)"
)]
struct Args {
    /// Path to the real raster (Grid JSON)
    #[arg(long)]
    real: PathBuf,

    /// Path to the synthetic raster (Grid JSON)
    #[arg(long)]
    synthetic: PathBuf,

    /// Optional real binary label raster (LabelGrid JSON)
    #[arg(long)]
    real_labels: Option<PathBuf>,

    /// Optional synthetic binary label raster (LabelGrid JSON)
    #[arg(long)]
    synthetic_labels: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report {
    distributions: DistributionComparison,
    correlation: f32,
    area_ratio: Option<f32>,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let real: Grid = load_json(&args.real)?;
    let synthetic: Grid = load_json(&args.synthetic)?;

    let distributions = compare_distributions(&real, &synthetic);
    let correlation = spatial_correlation(&real, &synthetic)?;

    let area_ratio = match (&args.real_labels, &args.synthetic_labels) {
        (Some(rl), Some(sl)) => {
            let real_labels: LabelGrid = load_json(rl)?;
            let synthetic_labels: LabelGrid = load_json(sl)?;
            Some(labelled_area_ratio(&real_labels, &synthetic_labels))
        }
        _ => None,
    };

    let report = Report {
        distributions,
        correlation,
        area_ratio,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
