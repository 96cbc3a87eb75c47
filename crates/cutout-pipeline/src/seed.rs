//! Seed collection: turn a brush stroke or click into growth origins.
//!
//! The stroke is rendered as a round-capped, round-joined polyline onto a
//! scratch image the same size as the layer. Every pixel the stroke
//! touches exceeds the seed threshold and becomes a seed, and the rounded
//! mean color of the source pixels under those seeds is the target color
//! for region growing.
//!
//! Rendering uses `tiny-skia`, which handles sub-pixel positioning and
//! anti-aliasing, so fractional pointer coordinates behave the same as
//! they would on an interactive canvas.

use image::{GrayImage, Luma, RgbaImage};
use serde::{Deserialize, Serialize};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::color::{LabColor, to_lab};
use crate::types::{CutoutError, Dimensions, Point, Stroke};

/// Growth origins and the color they were sampled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seeds {
    /// Row-major pixel indices (`y * width + x`), ascending.
    pub indices: Vec<usize>,
    /// Rounded mean sRGB color of the seed pixels.
    pub mean_rgb: [u8; 3],
    /// `mean_rgb` in Lab space.
    pub target: LabColor,
    /// `true` when the rendered stroke covered no pixel and the first
    /// stroke point was used as the sole seed.
    pub fallback: bool,
}

/// Render a stroke into a scratch intensity image.
///
/// The stroke is drawn anti-aliased as opaque white on transparent black,
/// and each output pixel is the straight (unpremultiplied) red channel of
/// the result: 255 wherever the stroke touches the pixel at all, 0
/// elsewhere. A stroke with a single point, or whose points all coincide,
/// has zero length and draws nothing. Strokes with a non-positive or
/// non-finite width, no points, or an unrenderable path also produce a
/// blank image.
#[must_use = "returns the rendered stroke mask"]
#[allow(clippy::cast_possible_truncation)]
pub fn rasterize_stroke(stroke: &Stroke, dimensions: Dimensions) -> GrayImage {
    let blank = || GrayImage::new(dimensions.width, dimensions.height);

    if !(stroke.width.is_finite() && stroke.width > 0.0) {
        return blank();
    }
    let Some(first) = stroke.first() else {
        return blank();
    };
    if stroke.points.iter().all(|p| *p == first) {
        return blank();
    }
    let Some(mut pixmap) = Pixmap::new(dimensions.width, dimensions.height) else {
        return blank();
    };

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in &stroke.points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    let Some(path) = pb.finish() else {
        return blank();
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;

    let line = tiny_skia::Stroke {
        width: stroke.width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &line, Transform::identity(), None);

    let mut mask = blank();
    for (dst, src) in mask.pixels_mut().zip(pixmap.pixels()) {
        if src.alpha() > 0 {
            *dst = Luma([src.demultiply().red()]);
        }
    }
    mask
}

/// Collect the seed pixels and target color for a stroke.
///
/// Renders the stroke with [`rasterize_stroke`] and hands the result to
/// [`seeds_from_mask`].
///
/// # Errors
///
/// Returns [`CutoutError::EmptyInput`] if the image has no pixels.
/// Returns [`CutoutError::EmptySeed`] if the stroke has no points.
pub fn collect_seeds(
    image: &RgbaImage,
    stroke: &Stroke,
    threshold: u8,
) -> Result<Seeds, CutoutError> {
    let mask = rasterize_stroke(stroke, Dimensions::of(image));
    seeds_from_mask(image, &mask, stroke, threshold)
}

/// Collect seeds from an already rendered stroke mask.
///
/// Pixels whose mask value is strictly greater than `threshold` are
/// seeds. When no pixel qualifies (a zero-length or off-image stroke),
/// the pixel under the first stroke point, clamped into the image,
/// becomes the sole seed.
///
/// # Errors
///
/// Returns [`CutoutError::EmptyInput`] if the image has no pixels.
/// Returns [`CutoutError::EmptySeed`] if the stroke has no points.
/// Returns [`CutoutError::DimensionMismatch`] if `mask` and `image`
/// differ in size.
pub fn seeds_from_mask(
    image: &RgbaImage,
    mask: &GrayImage,
    stroke: &Stroke,
    threshold: u8,
) -> Result<Seeds, CutoutError> {
    let dimensions = Dimensions::of(image);
    if dimensions.is_empty() {
        return Err(CutoutError::EmptyInput);
    }
    let first = stroke.first().ok_or(CutoutError::EmptySeed)?;
    let mask_dimensions = Dimensions {
        width: mask.width(),
        height: mask.height(),
    };
    if mask_dimensions != dimensions {
        return Err(CutoutError::DimensionMismatch {
            image: dimensions,
            mask: mask_dimensions,
        });
    }

    let width = dimensions.width as usize;
    let mut indices = Vec::new();
    let mut sums = [0u64; 3];
    for (x, y, c) in mask.enumerate_pixels() {
        if c.0[0] > threshold {
            indices.push(y as usize * width + x as usize);
            let px = image.get_pixel(x, y).0;
            for (sum, channel) in sums.iter_mut().zip(px) {
                *sum += u64::from(channel);
            }
        }
    }

    if indices.is_empty() {
        return fallback_seed(image, first, dimensions);
    }

    let mean_rgb = rounded_mean(sums, indices.len());
    log::debug!(
        "collected {} seed pixels from {}-point stroke (width {:.1}), mean rgb {mean_rgb:?}",
        indices.len(),
        stroke.points.len(),
        stroke.width,
    );

    Ok(Seeds {
        indices,
        mean_rgb,
        target: to_lab(mean_rgb[0], mean_rgb[1], mean_rgb[2]),
        fallback: false,
    })
}

/// Use the pixel under `point` as the only seed.
fn fallback_seed(
    image: &RgbaImage,
    point: Point,
    dimensions: Dimensions,
) -> Result<Seeds, CutoutError> {
    let (x, y) = point.to_pixel(dimensions).ok_or(CutoutError::EmptyInput)?;
    log::warn!(
        "stroke covered no pixels; seeding from ({x}, {y}) under point ({:.1}, {:.1})",
        point.x,
        point.y,
    );

    let [r, g, b, _] = image.get_pixel(x, y).0;
    Ok(Seeds {
        indices: vec![y as usize * dimensions.width as usize + x as usize],
        mean_rgb: [r, g, b],
        target: to_lab(r, g, b),
        fallback: true,
    })
}

/// Per-channel mean rounded to the nearest integer.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rounded_mean(sums: [u64; 3], count: usize) -> [u8; 3] {
    let n = count as f64;
    sums.map(|s| (s as f64 / n).round().clamp(0.0, 255.0) as u8)
}
