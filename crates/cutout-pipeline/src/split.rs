//! Split a layer into an extracted region and a hole mask.
//!
//! The extracted buffer keeps every color channel of the source and
//! takes the selection as its alpha. The hole mask is an opaque
//! grayscale image whose luminance is the complement of the selection,
//! so stacking the extracted layer over the masked original covers
//! each boundary pixel exactly once (up to integer rounding).

use image::{Rgba, RgbaImage};

use crate::codec::encode_png;
use crate::grow::SelectionMap;
use crate::types::{CutoutError, CutoutOutput, Dimensions};

/// The two pixel buffers produced from one selection.
#[derive(Debug, Clone)]
pub struct SplitBuffers {
    /// Source colors with the selection written into alpha.
    pub extracted: RgbaImage,
    /// Opaque grayscale mask: 255 keeps the original, 0 hides it.
    pub hole_mask: RgbaImage,
}

impl SplitBuffers {
    /// Encode both buffers as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CutoutError::ImageEncode`] if either image fails to
    /// encode; no partial output is returned.
    pub fn encode(&self) -> Result<CutoutOutput, CutoutError> {
        let extracted = encode_png(&self.extracted)?;
        let hole_mask = encode_png(&self.hole_mask)?;
        Ok(CutoutOutput {
            extracted,
            hole_mask,
            dimensions: Dimensions::of(&self.extracted),
        })
    }
}

/// Selection scaled to `0.0..=255.0`.
fn scaled(selection: f32) -> f64 {
    f64::from(selection.clamp(0.0, 1.0)) * 255.0
}

/// Alpha for the extracted layer: `floor(selection * 255)`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn extracted_alpha(selection: f32) -> u8 {
    scaled(selection).floor() as u8
}

/// Hole mask luminance: `floor(255 * (1 - selection))`.
///
/// Evaluated in `f64`, where `1 - selection` is exact for any `f32`
/// selection of practical size, so together with [`extracted_alpha`] the
/// pair always sums to 254 or 255.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hole_value(selection: f32) -> u8 {
    let s = f64::from(selection.clamp(0.0, 1.0));
    (255.0 * (1.0 - s)).floor() as u8
}

/// Build the extracted and hole-mask buffers.
///
/// `source` is copied; the caller's buffer is never modified.
///
/// # Errors
///
/// Returns [`CutoutError::DimensionMismatch`] if the selection was
/// computed for an image of a different size.
pub fn split_layer(
    source: &RgbaImage,
    selection: &SelectionMap,
) -> Result<SplitBuffers, CutoutError> {
    let dimensions = Dimensions::of(source);
    if selection.dimensions() != dimensions {
        return Err(CutoutError::DimensionMismatch {
            image: dimensions,
            mask: selection.dimensions(),
        });
    }

    let mut extracted = source.clone();
    for (pixel, &s) in extracted.pixels_mut().zip(selection.values()) {
        pixel.0[3] = extracted_alpha(s);
    }

    let mut hole_mask = RgbaImage::new(dimensions.width, dimensions.height);
    for (pixel, &s) in hole_mask.pixels_mut().zip(selection.values()) {
        let v = hole_value(s);
        *pixel = Rgba([v, v, v, 255]);
    }

    Ok(SplitBuffers {
        extracted,
        hole_mask,
    })
}
