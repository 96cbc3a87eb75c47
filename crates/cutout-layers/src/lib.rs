//! cutout-layers: layer records, cutout application, and export (sans-IO).
//!
//! Wraps `cutout-pipeline` with the layer-level bookkeeping a document
//! needs around a cutout: splitting one layer into a masked base and an
//! extracted layer, keeping draw order, and baking hole masks into
//! standalone PNGs on export.

pub mod apply;
mod error;
pub mod export;
pub mod layer;
pub mod stack;

pub use apply::{apply_cutout, cutout_layer};
pub use error::LayerError;
pub use export::{ExportedLayer, export_file_name, export_layer, export_layers};
pub use layer::Layer;
pub use stack::LayerStack;
