//! cutout: command-line front end for the smart cutout engine.
//!
//! Splits an image into an extracted layer and a hole mask from a brush
//! stroke or a click, and bakes hole masks into standalone PNGs.
//!
//! # Usage
//!
//! ```text
//! cutout split photo.png --point 120,80 --point 160,90 --width 12 \
//!     --extracted part.png --hole hole.png
//! cutout split photo.png --click --point 120,80 --extracted part.png --hole hole.png
//! cutout bake photo.png --mask hole.png --output base.png
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use cutout_layers::{Layer, apply_cutout, export_layer};
use cutout_pipeline::{CutoutConfig, Gesture, Point, Stroke};
use log::LevelFilter;

/// Seeded region-growing cutout for raster layers.
#[derive(Parser)]
#[command(name = "cutout", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log stage details (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print machine-readable JSON to stdout instead of a report.
    #[arg(long, global = true)]
    json: bool,

    /// Full cutout config as a JSON string.
    ///
    /// When provided, the individual tuning flags are ignored. Missing
    /// fields take their defaults.
    #[arg(long, global = true)]
    config_json: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Cut a region out of an image.
    Split(SplitArgs),
    /// Multiply an image's alpha by a hole mask.
    Bake(BakeArgs),
}

#[derive(Args)]
struct SplitArgs {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Stroke point as `X,Y` in image pixels. Repeat for a polyline.
    #[arg(long = "point", short, required = true, value_parser = parse_point)]
    points: Vec<Point>,

    /// Brush diameter in pixels.
    #[arg(long, default_value_t = CutoutConfig::CLICK_STROKE_WIDTH)]
    width: f64,

    /// Treat the first point as a click (fixed diameter, other points
    /// and `--width` ignored).
    #[arg(long)]
    click: bool,

    /// Where to write the extracted layer PNG.
    #[arg(long)]
    extracted: PathBuf,

    /// Where to write the hole mask PNG.
    #[arg(long)]
    hole: PathBuf,

    /// Also write the input with the hole mask baked in.
    #[arg(long)]
    base: Option<PathBuf>,

    /// Full-selection color distance (CIE76).
    #[arg(long, default_value_t = CutoutConfig::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Width of the feathered band beyond the tolerance.
    #[arg(long, default_value_t = CutoutConfig::DEFAULT_SOFT_EDGE)]
    soft_edge: f64,

    /// Feathered selections at or below this value stop growing.
    #[arg(long, default_value_t = CutoutConfig::DEFAULT_GROWTH_CUTOFF)]
    growth_cutoff: f64,

    /// Stroke mask intensity (0-255) a pixel must exceed to be a seed.
    #[arg(long, default_value_t = CutoutConfig::DEFAULT_SEED_THRESHOLD)]
    seed_threshold: u8,
}

#[derive(Args)]
struct BakeArgs {
    /// Path to the layer image.
    image_path: PathBuf,

    /// Hole mask (white shows, black hides), same size as the image.
    #[arg(long)]
    mask: PathBuf,

    /// Where to write the baked PNG.
    #[arg(long)]
    output: PathBuf,
}

/// Parse `X,Y` into a [`Point`].
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate {v:?}: {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn config_from_cli(config_json: Option<&str>, args: &SplitArgs) -> Result<CutoutConfig, String> {
    if let Some(json) = config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(CutoutConfig {
        tolerance: args.tolerance,
        soft_edge: args.soft_edge,
        growth_cutoff: args.growth_cutoff,
        seed_threshold: args.seed_threshold,
        ..CutoutConfig::default()
    })
}

fn gesture_from_cli(args: &SplitArgs) -> Gesture {
    match (args.click, args.points.first()) {
        (true, Some(&point)) => Gesture::Click(point),
        _ => Gesture::Brush(Stroke::new(args.points.clone(), args.width)),
    }
}

/// Layer name for a file: its stem, or empty if it has none.
fn layer_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn read(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("Error reading {}: {e}", path.display()))
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), String> {
    std::fs::write(path, bytes).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    eprintln!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn run_split(cli: &Cli, args: &SplitArgs) -> Result<(), Box<dyn Error>> {
    let config = config_from_cli(cli.config_json.as_deref(), args)?;
    let gesture = gesture_from_cli(args);
    let image_bytes = read(&args.image_path)?;

    eprintln!(
        "Image: {} ({} bytes)",
        args.image_path.display(),
        image_bytes.len(),
    );
    eprintln!("Gesture: {gesture:?}");
    eprintln!("Config: {config:#?}");
    eprintln!();

    let (output, diagnostics) =
        cutout_pipeline::cutout_encoded_with_diagnostics(&image_bytes, &gesture, &config)?;

    let dimensions = output.dimensions;
    let source = Layer::new(
        "source",
        layer_name(&args.image_path),
        image_bytes,
        f64::from(dimensions.width),
        f64::from(dimensions.height),
    );
    let (base, extracted) = apply_cutout(&source, output, "extracted", source.z_index + 1);

    write(&args.extracted, &extracted.src)?;
    if let Some(ref hole) = base.erase_mask_image {
        write(&args.hole, hole)?;
    }
    if let Some(ref base_path) = args.base {
        write(base_path, &export_layer(&base)?.bytes)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        println!("{}", diagnostics.report());
    }
    Ok(())
}

fn run_bake(cli: &Cli, args: &BakeArgs) -> Result<(), Box<dyn Error>> {
    let layer = Layer {
        erase_mask_image: Some(read(&args.mask)?),
        ..Layer::new(
            "source",
            layer_name(&args.image_path),
            read(&args.image_path)?,
            0.0,
            0.0,
        )
    };

    let exported = export_layer(&layer)?;
    write(&args.output, &exported.bytes)?;

    if cli.json {
        let summary = serde_json::json!({
            "output": args.output.display().to_string(),
            "bytes": exported.bytes.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match &cli.command {
        Command::Split(args) => run_split(&cli, args),
        Command::Bake(args) => run_bake(&cli, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
