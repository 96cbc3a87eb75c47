//! An ordered document of layers.
//!
//! Keeps draw order and hands out ids. A cutout replaces the source
//! layer with its base and appends the extracted layer on top, so the
//! pair always ends up last in the list.

use cutout_pipeline::{CutoutConfig, Gesture};
use serde::{Deserialize, Serialize};

use crate::apply::cutout_layer;
use crate::error::LayerError;
use crate::export::{ExportedLayer, export_layers};
use crate::layer::Layer;

/// Layers in draw order (first is bottom).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: u64,
}

impl LayerStack {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers in draw order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Look up a layer by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Add an encoded image as a new top layer and return its id.
    pub fn push_image(
        &mut self,
        name: impl Into<String>,
        src: Vec<u8>,
        width: f64,
        height: f64,
    ) -> String {
        let id = self.allocate_id();
        let layer = Layer {
            z_index: self.top_z(),
            ..Layer::new(id.clone(), name, src, width, height)
        };
        self.layers.push(layer);
        id
    }

    /// Remove a layer.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::UnknownLayer`] if no layer has this id.
    pub fn remove(&mut self, id: &str) -> Result<Layer, LayerError> {
        let index = self.index_of(id)?;
        Ok(self.layers.remove(index))
    }

    /// Show or hide a layer.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::UnknownLayer`] if no layer has this id.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), LayerError> {
        let index = self.index_of(id)?;
        self.layers[index].visible = visible;
        Ok(())
    }

    /// Cut a region out of layer `id` and return the extracted layer's id.
    ///
    /// On success the source layer becomes its base (masked) and moves to
    /// the top of the list followed by the extracted layer. On failure
    /// the stack is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::UnknownLayer`] if no layer has this id, or
    /// [`LayerError::Cutout`] if the cutout fails.
    pub fn cutout(
        &mut self,
        id: &str,
        gesture: &Gesture,
        config: &CutoutConfig,
    ) -> Result<String, LayerError> {
        let index = self.index_of(id)?;
        let new_id = Self::format_id(self.next_id + 1);
        let top_z = self.top_z();

        let (base, extracted) =
            cutout_layer(&self.layers[index], gesture, config, new_id.clone(), top_z)?;

        self.next_id += 1;
        self.layers.remove(index);
        self.layers.push(base);
        self.layers.push(extracted);
        Ok(new_id)
    }

    /// Export every visible layer in draw order.
    #[must_use]
    pub fn export(&self) -> Vec<(String, Result<ExportedLayer, LayerError>)> {
        export_layers(&self.layers)
    }

    fn index_of(&self, id: &str) -> Result<usize, LayerError> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| LayerError::UnknownLayer(id.to_string()))
    }

    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        Self::format_id(self.next_id)
    }

    fn format_id(n: u64) -> String {
        format!("layer-{n}")
    }

    /// `z_index` for a layer placed above everything currently present.
    #[allow(clippy::cast_possible_truncation)]
    fn top_z(&self) -> u32 {
        self.layers.len() as u32 + 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cutout_pipeline::codec::{decode, encode_png};
    use cutout_pipeline::{CutoutError, Point, Stroke};
    use image::{Rgba, RgbaImage};

    fn two_tone_png() -> Vec<u8> {
        let image = RgbaImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgba([250, 250, 250, 255])
            } else {
                Rgba([10, 10, 60, 255])
            }
        });
        encode_png(&image).unwrap()
    }

    #[test]
    fn push_assigns_ids_and_z_order() {
        let mut stack = LayerStack::new();
        let a = stack.push_image("a", vec![], 1.0, 1.0);
        let b = stack.push_image("b", vec![], 1.0, 1.0);
        assert_eq!(a, "layer-1");
        assert_eq!(b, "layer-2");
        assert_eq!(stack.get(&a).unwrap().z_index, 1);
        assert_eq!(stack.get(&b).unwrap().z_index, 2);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut stack = LayerStack::new();
        let a = stack.push_image("a", vec![], 1.0, 1.0);
        stack.remove(&a).unwrap();
        assert_eq!(stack.push_image("b", vec![], 1.0, 1.0), "layer-2");
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut stack = LayerStack::new();
        assert!(matches!(
            stack.set_visible("nope", false),
            Err(LayerError::UnknownLayer(id)) if id == "nope"
        ));
    }

    #[test]
    fn cutout_moves_pair_to_top() {
        let mut stack = LayerStack::new();
        let photo = stack.push_image("Photo", two_tone_png(), 10.0, 10.0);
        let other = stack.push_image("Other", vec![], 1.0, 1.0);

        let gesture = Gesture::Brush(Stroke::new(vec![Point::new(1.5, 5.5)], 2.0));
        let part = stack
            .cutout(&photo, &gesture, &CutoutConfig::default())
            .unwrap();

        let names: Vec<&str> = stack.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Other", "Photo (Base)", "Photo (Extracted)"]);
        assert_eq!(stack.layers()[0].id, other);
        assert_eq!(part, "layer-3");
        assert_eq!(stack.get(&part).unwrap().z_index, 3);

        let extracted = decode(&stack.get(&part).unwrap().src).unwrap();
        assert_eq!(extracted.get_pixel(0, 0).0[3], 255);
        assert_eq!(extracted.get_pixel(9, 0).0[3], 0);
    }

    #[test]
    fn failed_cutout_leaves_stack_unchanged() {
        let mut stack = LayerStack::new();
        let id = stack.push_image("broken", vec![1, 2, 3], 1.0, 1.0);
        let before = stack.clone();

        let result = stack.cutout(
            &id,
            &Gesture::Click(Point::new(0.0, 0.0)),
            &CutoutConfig::default(),
        );
        assert!(matches!(
            result,
            Err(LayerError::Cutout(CutoutError::ImageDecode(_)))
        ));
        assert_eq!(stack, before);
    }

    #[test]
    fn export_skips_hidden() {
        let mut stack = LayerStack::new();
        let a = stack.push_image("a", vec![1], 1.0, 1.0);
        let b = stack.push_image("b", vec![2], 1.0, 1.0);
        stack.set_visible(&a, false).unwrap();

        let exported = stack.export();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].0, b);
        assert_eq!(exported[0].1.as_ref().unwrap().bytes, vec![2]);
    }
}
