//! Bake a hole mask into a layer's alpha channel for export.
//!
//! The mask's red channel stands in for luminance (hole masks are
//! written with R = G = B). Each source alpha is scaled by
//! `mask / 255` and floored. No resampling is done: source and mask
//! must already have identical dimensions.

use image::RgbaImage;

use crate::codec::{decode, encode_png};
use crate::types::{CutoutError, Dimensions};

/// Multiply `source` alpha by the mask's red channel, in place.
///
/// # Errors
///
/// Returns [`CutoutError::DimensionMismatch`] before touching any pixel
/// if the two images differ in size.
pub fn apply_mask(source: &mut RgbaImage, mask: &RgbaImage) -> Result<(), CutoutError> {
    let image = Dimensions::of(source);
    let mask_dims = Dimensions::of(mask);
    if image != mask_dims {
        return Err(CutoutError::DimensionMismatch {
            image,
            mask: mask_dims,
        });
    }

    for (pixel, m) in source.pixels_mut().zip(mask.pixels()) {
        pixel.0[3] = scale_alpha(pixel.0[3], m.0[0]);
    }
    Ok(())
}

/// `floor(alpha * mask / 255)` in integer arithmetic.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn scale_alpha(alpha: u8, mask: u8) -> u8 {
    (alpha as u16 * mask as u16 / 255) as u8
}

/// Decode a layer image and its hole mask, bake, and re-encode as PNG.
///
/// # Errors
///
/// Returns [`CutoutError::EmptyInput`] or [`CutoutError::ImageDecode`]
/// if either image cannot be decoded, [`CutoutError::DimensionMismatch`]
/// if their sizes differ, and [`CutoutError::ImageEncode`] if the result
/// cannot be encoded.
pub fn bake_mask(source: &[u8], mask: &[u8]) -> Result<Vec<u8>, CutoutError> {
    let mut image = decode(source)?;
    let mask = decode(mask)?;
    apply_mask(&mut image, &mask)?;
    log::debug!("baked hole mask into {} layer", Dimensions::of(&image));
    encode_png(&image)
}

/// Produce the exported bytes for a layer.
///
/// Without a mask the source bytes are returned unchanged (no decode,
/// no re-encode); with a mask this is [`bake_mask`].
///
/// # Errors
///
/// Same as [`bake_mask`] when a mask is present; infallible otherwise.
pub fn bake(source: &[u8], mask: Option<&[u8]>) -> Result<Vec<u8>, CutoutError> {
    match mask {
        Some(mask) => bake_mask(source, mask),
        None => Ok(source.to_vec()),
    }
}
