//! Export layers as standalone PNG files.
//!
//! A layer with a hole mask is exported with the mask baked into its
//! alpha channel; an unmasked layer exports its `src` bytes unchanged.
//! Hidden layers are skipped. Each layer succeeds or fails on its own.

use serde::{Deserialize, Serialize};

use crate::error::LayerError;
use crate::layer::Layer;

/// File stem used when a layer has an empty name.
pub const FALLBACK_FILE_STEM: &str = "layer";

/// One exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedLayer {
    /// Suggested file name, `"{name}.png"`.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// Whether a hole mask was baked into `bytes`.
    pub baked: bool,
}

/// Suggested export file name for a layer.
#[must_use]
pub fn export_file_name(layer: &Layer) -> String {
    let stem = if layer.name.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        &layer.name
    };
    format!("{stem}.png")
}

/// Export one layer, baking its hole mask if it has one.
///
/// Visibility is not checked here; see [`export_layers`].
///
/// # Errors
///
/// Returns [`LayerError::Cutout`] if the source or mask cannot be
/// decoded, their dimensions differ, or the baked image fails to encode.
pub fn export_layer(layer: &Layer) -> Result<ExportedLayer, LayerError> {
    let bytes = cutout_pipeline::bake(&layer.src, layer.erase_mask_image.as_deref())?;
    Ok(ExportedLayer {
        file_name: export_file_name(layer),
        bytes,
        baked: layer.is_masked(),
    })
}

/// Export every visible layer, in order.
///
/// Returns one `(layer id, result)` entry per visible layer. A failure
/// is reported for that layer only and does not stop the others.
#[must_use]
pub fn export_layers<'a>(
    layers: impl IntoIterator<Item = &'a Layer>,
) -> Vec<(String, Result<ExportedLayer, LayerError>)> {
    let mut results = Vec::new();
    for layer in layers {
        if !layer.visible {
            log::debug!("skipping hidden layer {:?}", layer.id);
            continue;
        }
        let result = export_layer(layer);
        match &result {
            Ok(exported) => log::info!(
                "exported layer {:?} as {} ({} bytes{})",
                layer.id,
                exported.file_name,
                exported.bytes.len(),
                if exported.baked { ", mask baked" } else { "" },
            ),
            Err(e) => log::warn!("failed to export layer {:?}: {e}", layer.id),
        }
        results.push((layer.id.clone(), result));
    }
    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cutout_pipeline::CutoutError;
    use cutout_pipeline::codec::{decode, encode_png};
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(width, height, Rgba(px))).unwrap()
    }

    #[test]
    fn file_name_uses_layer_name() {
        let layer = Layer::new("a", "Sky (Extracted)", vec![], 1.0, 1.0);
        assert_eq!(export_file_name(&layer), "Sky (Extracted).png");
    }

    #[test]
    fn empty_name_falls_back() {
        let layer = Layer::new("a", "", vec![], 1.0, 1.0);
        assert_eq!(export_file_name(&layer), "layer.png");
    }

    #[test]
    fn unmasked_layer_passes_bytes_through() {
        // Not even a valid image: unmasked export never decodes.
        let layer = Layer::new("a", "raw", vec![7, 7, 7], 1.0, 1.0);
        let exported = export_layer(&layer).unwrap();
        assert_eq!(exported.bytes, vec![7, 7, 7]);
        assert!(!exported.baked);
    }

    #[test]
    fn masked_layer_is_baked() {
        let layer = Layer {
            erase_mask_image: Some(png(2, 2, [0, 0, 0, 255])),
            ..Layer::new("a", "base", png(2, 2, [50, 60, 70, 255]), 2.0, 2.0)
        };
        let exported = export_layer(&layer).unwrap();
        assert!(exported.baked);
        let baked = decode(&exported.bytes).unwrap();
        assert!(baked.pixels().all(|p| p.0 == [50, 60, 70, 0]));
    }

    #[test]
    fn hidden_layers_are_skipped_and_failures_isolated() {
        let good = Layer::new("good", "good", png(1, 1, [1, 2, 3, 255]), 1.0, 1.0);
        let hidden = Layer {
            visible: false,
            ..Layer::new("hidden", "hidden", vec![], 1.0, 1.0)
        };
        let mismatched = Layer {
            erase_mask_image: Some(png(2, 1, [255, 255, 255, 255])),
            ..Layer::new("bad", "bad", png(1, 1, [1, 2, 3, 255]), 1.0, 1.0)
        };
        let last = Layer::new("last", "", png(1, 1, [9, 9, 9, 255]), 1.0, 1.0);

        let results = export_layers([&good, &hidden, &mismatched, &last]);
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["good", "bad", "last"]);

        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1,
            Err(LayerError::Cutout(CutoutError::DimensionMismatch { .. }))
        ));
        assert_eq!(results[2].1.as_ref().unwrap().file_name, "layer.png");
    }
}
