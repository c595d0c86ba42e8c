mod geojson;
mod viewport;

pub use geojson::{parse_parcels, read_parcels, Parcel};
pub use viewport::MapViewport;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use khasra_core::{
    export_edges_csv, export_survey_csv, measure_batch, BatchMeasurement, CsvExportConfig,
    FeatureMeasurement, GeoCoordinate, LabelKind, LabelSpec, ReferenceFrame, SkippedFeature,
};
use khasra_labels::{
    LabelCandidate, LabelPlacer, PlacementConfig, PlacementResult, PriorityClass,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "khasra")]
#[command(about = "Khasra parcel measurement and map labelling")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List supported reference frames.
    Frames,
    /// Print machine-readable measurements for every parcel.
    Measure {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, default_value = "utm43n")]
        frame: String,
    },
    /// Place area and edge labels over a map viewport.
    Labels {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, default_value = "utm43n")]
        frame: String,
        #[arg(long, allow_negative_numbers = true)]
        center_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        center_lat: f64,
        #[arg(long)]
        zoom: f64,
        #[arg(long, default_value_t = 1024.0)]
        width: f64,
        #[arg(long, default_value_t = 768.0)]
        height: f64,
        /// Seed for the fallback jitter; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// JSON file with placement configuration overrides.
        #[arg(long, value_name = "JSON")]
        config: Option<PathBuf>,
    },
    /// Write a CSV report of parcel areas or boundary edges.
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, default_value = "utm43n")]
        frame: String,
        /// One row per boundary edge instead of per parcel.
        #[arg(long)]
        edges: bool,
        /// Append rows for parcels that could not be measured.
        #[arg(long)]
        include_skipped: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct FrameOutput {
    key: &'static str,
    name: &'static str,
    epsg: u32,
}

#[derive(Debug, Serialize)]
struct MeasureOutput<'a> {
    frame: ReferenceFrame,
    features: Vec<MeasuredFeatureOutput<'a>>,
    skipped: &'a [SkippedFeature],
}

#[derive(Debug, Serialize)]
struct MeasuredFeatureOutput<'a> {
    id: &'a str,
    perimeter_meters: f64,
    #[serde(flatten)]
    measurement: &'a FeatureMeasurement,
}

#[derive(Debug, Serialize)]
struct LabelsOutput<'a> {
    frame: ReferenceFrame,
    viewport: MapViewport,
    labels: Vec<PlacedLabelOutput>,
    skipped: &'a [SkippedFeature],
}

#[derive(Debug, Serialize)]
struct PlacedLabelOutput {
    text: String,
    kind: LabelKind,
    /// False when the label center falls outside the viewport
    on_screen: bool,
    #[serde(flatten)]
    placement: PlacementResult<GeoCoordinate>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Frames => run_frames(),
        Commands::Measure { file, frame } => run_measure(&file, &frame),
        Commands::Labels {
            file,
            frame,
            center_lon,
            center_lat,
            zoom,
            width,
            height,
            seed,
            config,
        } => {
            let center = GeoCoordinate::new(center_lon, center_lat);
            let viewport = MapViewport::new(center, zoom, width, height);
            run_labels(&file, &frame, viewport, seed, config.as_deref())
        }
        Commands::Export { file, frame, edges, include_skipped, output } => {
            run_export(&file, &frame, edges, include_skipped, output.as_deref())
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_frames() -> Result<()> {
    let frames: Vec<FrameOutput> = ReferenceFrame::ALL
        .iter()
        .map(|frame| FrameOutput {
            key: frame.compact_name(),
            name: frame.name(),
            epsg: frame.epsg(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&frames)?);
    Ok(())
}

fn run_measure(file: &Path, frame: &str) -> Result<()> {
    let (frame, batch) = measure_file(file, frame)?;

    let features = batch
        .measured
        .iter()
        .map(|(id, measurement)| MeasuredFeatureOutput {
            id,
            perimeter_meters: measurement.perimeter_meters(),
            measurement,
        })
        .collect();
    let payload = MeasureOutput { frame, features, skipped: &batch.skipped };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run_labels(
    file: &Path,
    frame: &str,
    viewport: MapViewport,
    seed: Option<u64>,
    config: Option<&Path>,
) -> Result<()> {
    if !(viewport.zoom.is_finite() && viewport.width > 0.0 && viewport.height > 0.0) {
        anyhow::bail!("viewport needs a finite zoom and a positive width and height");
    }

    let placer = LabelPlacer::with_config(match config {
        Some(path) => load_placement_config(path)?,
        None => PlacementConfig::default(),
    });
    let (frame, batch) = measure_file(file, frame)?;

    let specs = batch.label_specs();
    let candidates: Vec<LabelCandidate<GeoCoordinate>> = specs.iter().map(candidate).collect();

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let placements = placer.place(&candidates, &viewport, &mut rng);

    let labels = specs
        .into_iter()
        .zip(placements)
        .map(|(spec, placement)| PlacedLabelOutput {
            text: spec.text,
            kind: spec.kind,
            on_screen: viewport.contains(placement.screen_position),
            placement,
        })
        .collect();
    let payload = LabelsOutput { frame, viewport, labels, skipped: &batch.skipped };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run_export(
    file: &Path,
    frame: &str,
    edges: bool,
    include_skipped: bool,
    output: Option<&Path>,
) -> Result<()> {
    let (_, batch) = measure_file(file, frame)?;
    let config = CsvExportConfig { include_skipped, ..Default::default() };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let writer = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_report(writer, &batch, edges, &config)?;
            println!("{}", path.display());
        }
        None => write_report(std::io::stdout().lock(), &batch, edges, &config)?,
    }

    Ok(())
}

fn write_report<W: Write>(
    writer: W,
    batch: &BatchMeasurement,
    edges: bool,
    config: &CsvExportConfig,
) -> Result<()> {
    if edges {
        export_edges_csv(writer, batch, config).context("failed to write edge report")?;
    } else {
        export_survey_csv(writer, batch, config).context("failed to write survey report")?;
    }
    Ok(())
}

fn measure_file(file: &Path, frame: &str) -> Result<(ReferenceFrame, BatchMeasurement)> {
    let frame: ReferenceFrame = frame.parse()?;
    ensure_file_exists(file)?;

    let parcels = read_parcels(file)?;
    Ok((frame, measure_parcels(&parcels, frame)))
}

/// Measure every readable parcel; unreadable ones are reported as skipped
pub fn measure_parcels(parcels: &[Parcel], frame: ReferenceFrame) -> BatchMeasurement {
    let readable = parcels
        .iter()
        .filter_map(|parcel| Some((parcel.id.as_str(), parcel.ring.as_deref().ok()?)));
    let mut batch = measure_batch(readable, frame);

    for parcel in parcels {
        if let Err(err) = &parcel.ring {
            log::warn!("skipping feature {}: {err}", parcel.id);
            batch.skipped.push(SkippedFeature {
                feature_id: parcel.id.clone(),
                reason: err.to_string(),
            });
        }
    }
    batch
}

fn candidate(spec: &LabelSpec) -> LabelCandidate<GeoCoordinate> {
    let priority = match spec.kind {
        LabelKind::Area => PriorityClass::Primary,
        LabelKind::Edge => PriorityClass::Secondary,
    };
    LabelCandidate::new(spec.id.clone(), spec.anchor, spec.text.clone(), priority)
}

fn load_placement_config(path: &Path) -> Result<PlacementConfig> {
    ensure_file_exists(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid placement config in {}", path.display()))
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
