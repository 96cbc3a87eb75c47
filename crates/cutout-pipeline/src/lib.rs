//! cutout-pipeline: seeded region-growing cutout for raster layers (sans-IO).
//!
//! Splits one layer into two from a brush stroke or a click:
//! stroke rasterization -> seed collection -> Lab region growing with a
//! soft edge -> extracted layer + hole mask.
//!
//! Also bakes a hole mask into a layer's alpha for export. This crate
//! has **no I/O dependencies**: it works on in-memory byte slices and
//! pixel buffers. File handling lives in the `cutout` CLI.

pub mod codec;
pub mod color;
pub mod composite;
pub mod diagnostics;
pub mod grow;
pub mod pipeline;
pub mod seed;
pub mod split;
pub mod types;

pub use color::LabColor;
pub use composite::{apply_mask, bake, bake_mask};
pub use diagnostics::{CutoutDiagnostics, CutoutSummary, StageDiagnostics, StageMetrics};
pub use grow::{GrowParams, SelectionMap};
pub use pipeline::{Pipeline, StagedCutout};
pub use seed::Seeds;
pub use types::{
    CutoutConfig, CutoutError, CutoutOutput, Dimensions, Gesture, GrayImage, Point, RgbaImage,
    Stroke,
};

use web_time::Instant;

/// Cut a region out of a decoded layer.
///
/// The gesture is rendered into seed pixels, a selection is grown from
/// their mean color, and the layer is split into:
///
/// - `extracted`: the source colors with the selection as alpha;
/// - `hole_mask`: an opaque grayscale mask that is white where the
///   original should stay visible and black where the region was taken.
///
/// The input buffer is not modified.
///
/// # Errors
///
/// Returns [`CutoutError::InvalidConfig`] if `config` is out of range.
/// Returns [`CutoutError::EmptyInput`] if the image has no pixels.
/// Returns [`CutoutError::EmptySeed`] if a brush gesture has no points.
/// Returns [`CutoutError::ImageEncode`] if an output fails to encode.
pub fn cutout(
    image: &RgbaImage,
    gesture: &Gesture,
    config: &CutoutConfig,
) -> Result<CutoutOutput, CutoutError> {
    log::info!("{} cutout on {} layer", gesture.mode(), Dimensions::of(image));
    let (output, diagnostics) = run_timed(image, gesture, config)?;
    log::info!(
        "cutout selected {} of {} pixels",
        diagnostics.summary.selected_count,
        Dimensions::of(image).pixel_count(),
    );
    Ok(output)
}

/// Decode `image_bytes` (PNG, JPEG, BMP, WebP) and run [`cutout`].
///
/// # Errors
///
/// Returns [`CutoutError::EmptyInput`] or [`CutoutError::ImageDecode`]
/// if the bytes cannot be decoded, then anything [`cutout`] returns.
pub fn cutout_encoded(
    image_bytes: &[u8],
    gesture: &Gesture,
    config: &CutoutConfig,
) -> Result<CutoutOutput, CutoutError> {
    let image = codec::decode(image_bytes)?;
    cutout(&image, gesture, config)
}

/// Run [`cutout`] and collect per-stage timing and counts.
///
/// # Errors
///
/// Same as [`cutout`].
pub fn cutout_with_diagnostics(
    image: &RgbaImage,
    gesture: &Gesture,
    config: &CutoutConfig,
) -> Result<(CutoutOutput, CutoutDiagnostics), CutoutError> {
    let start = Instant::now();
    let (output, mut diagnostics) = run_timed(image, gesture, config)?;
    diagnostics.total_duration = start.elapsed();
    Ok((output, diagnostics))
}

/// Run [`cutout_encoded`] and collect per-stage timing and counts,
/// including the decode stage.
///
/// # Errors
///
/// Same as [`cutout_encoded`].
pub fn cutout_encoded_with_diagnostics(
    image_bytes: &[u8],
    gesture: &Gesture,
    config: &CutoutConfig,
) -> Result<(CutoutOutput, CutoutDiagnostics), CutoutError> {
    let start = Instant::now();
    let image = codec::decode(image_bytes)?;
    let decode = StageDiagnostics {
        duration: start.elapsed(),
        metrics: StageMetrics::Decode {
            input_bytes: image_bytes.len(),
            width: image.width(),
            height: image.height(),
        },
    };

    let (output, mut diagnostics) = run_timed(&image, gesture, config)?;
    diagnostics.decode = Some(decode);
    diagnostics.total_duration = start.elapsed();
    Ok((output, diagnostics))
}

/// Time the seed, grow, and split stages.
///
/// `total_duration` is left as the sum of the three stages; callers
/// overwrite it with their own wall-clock measurement.
fn run_timed(
    image: &RgbaImage,
    gesture: &Gesture,
    config: &CutoutConfig,
) -> Result<(CutoutOutput, CutoutDiagnostics), CutoutError> {
    config.validate()?;
    let dimensions = Dimensions::of(image);

    let t = Instant::now();
    let stroke = gesture.to_stroke(config);
    let seeds = seed::collect_seeds(image, &stroke, config.seed_threshold)?;
    let seed = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Seed {
            mode: gesture.mode().to_string(),
            stroke_points: stroke.points.len(),
            stroke_width: stroke.width,
            seed_count: seeds.indices.len(),
            mean_rgb: seeds.mean_rgb,
            fallback: seeds.fallback,
        },
    };

    let t = Instant::now();
    let selection = grow::grow_region(
        image,
        &seeds.indices,
        seeds.target,
        GrowParams::from(config),
    );
    let stats = selection.stats();
    let grow = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Grow {
            tolerance: config.tolerance,
            soft_edge: config.soft_edge,
            full_count: stats.full,
            partial_count: stats.partial,
            total_pixel_count: dimensions.pixel_count(),
        },
    };

    let t = Instant::now();
    let output = split::split_layer(image, &selection)?.encode()?;
    let split = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Split {
            extracted_bytes: output.extracted.len(),
            hole_mask_bytes: output.hole_mask.len(),
        },
    };

    let selected_count = stats.full + stats.partial;
    let summary = CutoutSummary {
        image_width: dimensions.width,
        image_height: dimensions.height,
        selected_count,
        coverage: diagnostics::fraction(selected_count, dimensions.pixel_count()),
    };
    let total_duration = seed.duration + grow.duration + split.duration;

    log::debug!(
        "cutout stages: seed {:?}, grow {:?}, split {:?}",
        seed.duration,
        grow.duration,
        split.duration,
    );

    Ok((
        output,
        CutoutDiagnostics {
            decode: None,
            seed,
            grow,
            split,
            total_duration,
            summary,
        },
    ))
}
