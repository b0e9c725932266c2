/// Synthetic label generation tool: reads an elevation Grid JSON, runs one
/// domain synthesis pipeline, optionally thresholds and tiles the result,
/// and writes a JSON dataset for downstream training loaders.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use geosynth_core::grid::{Grid, LabelGrid};
use geosynth_core::synthesis::{
    percentile_threshold, synthesize_flood_risk, synthesize_road_connectivity,
    synthesize_urban_density, threshold, validate_specs, ConstraintSpec, Domain, LabelCutoff,
    LatentFieldSpec, SynthesisSpec,
};
use geosynth_core::terrain::{flood_features, surface_features};
use geosynth_core::tiling::{tile_pairs, TilePair};

#[derive(Parser, Debug)]
#[command(
    name = "labelgen",
    about = "Generate synthetic hazard label rasters from an elevation grid"
)]
struct Args {
    /// Path to an elevation Grid JSON file (required unless --dry-run)
    #[arg(long)]
    dem: Option<PathBuf>,

    /// Hazard domain: flood | road | urban
    #[arg(long, default_value = "flood")]
    domain: String,

    /// Number of independent samples
    #[arg(long, default_value = "1")]
    samples: usize,

    /// Base seed (omit for non-deterministic draws)
    #[arg(long)]
    seed: Option<u64>,

    /// Fixed label cutoff; mutually exclusive with --label-percentile
    #[arg(long)]
    cutoff: Option<f32>,

    /// Percentile-derived label cutoff (0-100)
    #[arg(long)]
    label_percentile: Option<f32>,

    /// Tile size in cells; 0 exports the whole raster untiled
    #[arg(long, default_value = "256")]
    tile_size: usize,

    /// Overlap between neighbouring tiles, in cells
    #[arg(long, default_value = "64")]
    overlap: usize,

    /// Output dataset path
    #[arg(short, long, default_value = "dataset.json")]
    output: PathBuf,

    /// JSON config file overriding the domain's default specs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Validate configuration and exit without generating data
    #[arg(long)]
    dry_run: bool,
}

/// Optional spec overrides; absent sections fall back to domain defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    synthesis: Option<SynthesisSpec>,
    constraints: Option<ConstraintSpec>,
    latent: Option<LatentFieldSpec>,
}

#[derive(Serialize)]
struct ResolvedSpecs<'a> {
    domain: &'a str,
    synthesis: &'a SynthesisSpec,
    constraints: &'a ConstraintSpec,
    latent: &'a LatentFieldSpec,
}

#[derive(Serialize)]
struct Dataset {
    domain: String,
    samples: usize,
    synthesis: SynthesisSpec,
    constraints: ConstraintSpec,
    latent: LatentFieldSpec,
    fields: Vec<Grid>,
    labels: Option<Vec<LabelGrid>>,
    tiles: Option<Vec<TilePair>>,
}

fn resolve_specs(
    domain: Domain,
    config: Option<&Path>,
    seed: Option<u64>,
) -> Result<(SynthesisSpec, ConstraintSpec, LatentFieldSpec)> {
    let file = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<ConfigFile>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ConfigFile::default(),
    };

    let mut synthesis = file.synthesis.unwrap_or_else(|| domain.default_spec());
    let constraints = file
        .constraints
        .unwrap_or_else(|| domain.default_constraints());
    let latent = file.latent.unwrap_or_else(|| domain.default_latent_spec());

    // CLI seed wins over the config file.
    if seed.is_some() {
        synthesis.seed = seed;
    }
    Ok((synthesis, constraints, latent))
}

fn feature_channels(domain: Domain, dem: &Grid) -> Vec<Grid> {
    match domain {
        Domain::Flood => {
            let f = flood_features(dem);
            vec![f.elevation, f.slope, f.flow_accumulation, f.base_risk]
        }
        Domain::Road | Domain::Urban => {
            let f = surface_features(dem);
            vec![f.elevation, f.gradient, f.flatness]
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let domain: Domain = args.domain.parse()?;
    let (synthesis, constraints, latent) =
        resolve_specs(domain, args.config.as_deref(), args.seed)?;

    if args.dry_run {
        validate_specs(&synthesis, &constraints, &latent, domain)?;
        let resolved = ResolvedSpecs {
            domain: domain.name(),
            synthesis: &synthesis,
            constraints: &constraints,
            latent: &latent,
        };
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        println!("Dry-run successful. No data generated.");
        return Ok(());
    }

    let cutoff = match (args.cutoff, args.label_percentile) {
        (Some(_), Some(_)) => bail!("--cutoff and --label-percentile are mutually exclusive"),
        (Some(t), None) => Some(LabelCutoff::Fixed(t)),
        (None, Some(p)) => Some(LabelCutoff::Percentile(p)),
        (None, None) => None,
    };

    let dem_path = args
        .dem
        .as_ref()
        .context("--dem is required unless --dry-run")?;
    let dem: Grid = serde_json::from_str(
        &fs::read_to_string(dem_path)
            .with_context(|| format!("reading DEM {}", dem_path.display()))?,
    )
    .with_context(|| format!("parsing DEM {}", dem_path.display()))?;

    eprintln!(
        "Generating {} {} sample(s) over {}x{}...",
        args.samples,
        domain.name(),
        dem.width,
        dem.height
    );
    let fields = match domain {
        Domain::Flood => synthesize_flood_risk(&dem, &synthesis, &constraints, &latent, args.samples),
        Domain::Road => {
            synthesize_road_connectivity(&dem, &synthesis, &constraints, &latent, args.samples)
        }
        Domain::Urban => {
            synthesize_urban_density(&dem, &synthesis, &constraints, &latent, args.samples)
        }
    }?;

    let labels: Option<Vec<LabelGrid>> = cutoff.map(|c| {
        fields
            .iter()
            .map(|f| match c {
                LabelCutoff::Fixed(t) => threshold(f, t),
                LabelCutoff::Percentile(p) => percentile_threshold(f, p),
            })
            .collect()
    });

    let tiles = match (&labels, args.tile_size) {
        (Some(labels), tile_size) if tile_size > 0 => {
            eprintln!("Tiling dataset ({}px, overlap {})...", tile_size, args.overlap);
            let channels = feature_channels(domain, &dem);
            Some(tile_pairs(&channels, &labels[0], tile_size, args.overlap)?)
        }
        _ => None,
    };

    let dataset = Dataset {
        domain: domain.name().to_string(),
        samples: args.samples,
        synthesis,
        constraints,
        latent,
        fields,
        labels,
        tiles,
    };
    fs::write(&args.output, serde_json::to_string(&dataset)?)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
