//! Image decoding and lossless encoding.
//!
//! Decoding accepts raw image bytes (PNG, JPEG, BMP, WebP) and yields a
//! straight-alpha RGBA8 pixel buffer. Encoding always writes RGBA8 PNG so
//! per-pixel alpha and dimensions round-trip exactly.

use image::{ImageEncoder, RgbaImage};

use crate::types::CutoutError;

/// Decode raw image bytes into an RGBA pixel buffer.
///
/// # Errors
///
/// Returns [`CutoutError::EmptyInput`] if `bytes` is empty or the image
/// has zero area.
/// Returns [`CutoutError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, CutoutError> {
    if bytes.is_empty() {
        return Err(CutoutError::EmptyInput);
    }

    let img = image::load_from_memory(bytes).map_err(CutoutError::ImageDecode)?;
    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CutoutError::EmptyInput);
    }
    Ok(rgba)
}

/// Encode an RGBA pixel buffer as PNG bytes.
///
/// # Errors
///
/// Returns [`CutoutError::ImageEncode`] if the PNG encoder rejects the
/// buffer.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CutoutError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(CutoutError::ImageEncode)?;
    Ok(buf)
}
