//! The layer record.

use serde::{Deserialize, Serialize};

/// One raster layer in a document.
///
/// `src` holds the encoded image. `erase_mask_image`, when present, is an
/// encoded grayscale image of the same pixel size whose luminance hides
/// the layer (255 shows, 0 hides). Geometry is display-space and has no
/// effect on cutouts, which always work at the layer's native
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier within a document.
    pub id: String,
    /// Display name, also used as the export file stem.
    pub name: String,
    /// Encoded layer image.
    pub src: Vec<u8>,
    /// Encoded hole mask, if a cutout has been taken from this layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erase_mask_image: Option<Vec<u8>>,
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    /// Display width in canvas units.
    pub width: f64,
    /// Display height in canvas units.
    pub height: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; larger draws on top.
    pub z_index: u32,
    /// Hidden layers are skipped on export.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

const fn default_visible() -> bool {
    true
}

impl Layer {
    /// A visible, unrotated, unmasked layer at the origin.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        src: Vec<u8>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            src,
            erase_mask_image: None,
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            z_index: 1,
            visible: true,
        }
    }

    /// Returns `true` if a hole mask must be baked in on export.
    #[must_use]
    pub const fn is_masked(&self) -> bool {
        self.erase_mask_image.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_layer_is_visible_and_unmasked() {
        let layer = Layer::new("layer-1", "Background", vec![1, 2, 3], 600.0, 450.0);
        assert!(layer.visible);
        assert!(!layer.is_masked());
        assert_eq!(layer.z_index, 1);
    }

    #[test]
    fn missing_visibility_defaults_to_visible() {
        let json = r#"{
            "id": "a", "name": "n", "src": [0],
            "x": 0, "y": 0, "width": 1, "height": 1, "z_index": 3
        }"#;
        let layer: Layer = serde_json::from_str(json).unwrap();
        assert!(layer.visible);
        assert!(layer.erase_mask_image.is_none());
        assert!(layer.rotation.abs() < f64::EPSILON);
    }
}
