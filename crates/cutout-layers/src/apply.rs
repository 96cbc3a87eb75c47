//! Turn a cutout result into a pair of layers.

use cutout_pipeline::{CutoutConfig, CutoutOutput, Gesture};

use crate::error::LayerError;
use crate::layer::Layer;

/// Suffix appended to the name of the layer the region was taken from.
pub const BASE_SUFFIX: &str = " (Base)";

/// Suffix appended to the name of the newly extracted layer.
pub const EXTRACTED_SUFFIX: &str = " (Extracted)";

/// Build the base and extracted layers from a finished cutout.
///
/// The base keeps every field of `original` except its name, and takes
/// the hole mask as its `erase_mask_image` (replacing any earlier mask).
/// The extracted layer copies the original geometry, gets `new_id`, the
/// extracted image as `src`, no mask, and `z_index = top_z`; it is always
/// visible.
#[must_use]
pub fn apply_cutout(
    original: &Layer,
    output: CutoutOutput,
    new_id: impl Into<String>,
    top_z: u32,
) -> (Layer, Layer) {
    let CutoutOutput {
        extracted,
        hole_mask,
        ..
    } = output;

    let extracted = Layer {
        id: new_id.into(),
        name: format!("{}{EXTRACTED_SUFFIX}", original.name),
        src: extracted,
        erase_mask_image: None,
        z_index: top_z,
        visible: true,
        ..original.clone()
    };

    let base = Layer {
        name: format!("{}{BASE_SUFFIX}", original.name),
        erase_mask_image: Some(hole_mask),
        ..original.clone()
    };

    (base, extracted)
}

/// Run a cutout on `layer.src` and build the resulting layer pair.
///
/// The cutout always reads the layer's unmasked source. `layer` is never
/// modified; on error no layers are produced.
///
/// # Errors
///
/// Returns [`LayerError::Cutout`] if the source cannot be decoded or the
/// cutout fails.
pub fn cutout_layer(
    layer: &Layer,
    gesture: &Gesture,
    config: &CutoutConfig,
    new_id: impl Into<String>,
    top_z: u32,
) -> Result<(Layer, Layer), LayerError> {
    let output = cutout_pipeline::cutout_encoded(&layer.src, gesture, config)?;
    log::info!("cut out layer {:?} ({})", layer.id, output.dimensions);
    Ok(apply_cutout(layer, output, new_id, top_z))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cutout_pipeline::{CutoutError, Dimensions, Point, Stroke};

    fn placed_layer() -> Layer {
        Layer {
            x: 200.0,
            y: 100.0,
            rotation: 15.0,
            z_index: 2,
            erase_mask_image: Some(vec![9, 9]),
            ..Layer::new("layer-1", "Photo", vec![1, 2, 3], 600.0, 450.0)
        }
    }

    fn fake_output() -> CutoutOutput {
        CutoutOutput {
            extracted: vec![10, 11],
            hole_mask: vec![20, 21],
            dimensions: Dimensions {
                width: 4,
                height: 4,
            },
        }
    }

    #[test]
    fn apply_names_and_routes_images() {
        let original = placed_layer();
        let (base, extracted) = apply_cutout(&original, fake_output(), "layer-2", 3);

        assert_eq!(base.id, "layer-1");
        assert_eq!(base.name, "Photo (Base)");
        assert_eq!(base.src, original.src);
        assert_eq!(base.erase_mask_image, Some(vec![20, 21]));
        assert_eq!(base.z_index, 2);

        assert_eq!(extracted.id, "layer-2");
        assert_eq!(extracted.name, "Photo (Extracted)");
        assert_eq!(extracted.src, vec![10, 11]);
        assert_eq!(extracted.erase_mask_image, None);
        assert_eq!(extracted.z_index, 3);
        assert!(extracted.visible);
    }

    #[test]
    fn extracted_keeps_geometry() {
        let original = placed_layer();
        let (_, extracted) = apply_cutout(&original, fake_output(), "layer-2", 3);
        assert!((extracted.x - original.x).abs() < f64::EPSILON);
        assert!((extracted.y - original.y).abs() < f64::EPSILON);
        assert!((extracted.width - original.width).abs() < f64::EPSILON);
        assert!((extracted.rotation - original.rotation).abs() < f64::EPSILON);
    }

    #[test]
    fn extracted_is_visible_even_from_hidden_layer() {
        let original = Layer {
            visible: false,
            ..placed_layer()
        };
        let (base, extracted) = apply_cutout(&original, fake_output(), "layer-2", 3);
        assert!(!base.visible);
        assert!(extracted.visible);
    }

    #[test]
    fn failed_cutout_produces_nothing() {
        let layer = placed_layer();
        let gesture = Gesture::Brush(Stroke::new(vec![Point::new(0.0, 0.0)], 4.0));
        let result = cutout_layer(&layer, &gesture, &CutoutConfig::default(), "layer-2", 3);
        assert!(matches!(
            result,
            Err(LayerError::Cutout(CutoutError::ImageDecode(_)))
        ));
    }
}
