use cutout_pipeline::CutoutError;

/// Errors from layer-level operations.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// The underlying cutout or mask bake failed.
    #[error(transparent)]
    Cutout(#[from] CutoutError),

    /// No layer with this id exists in the stack.
    #[error("no layer with id {0:?}")]
    UnknownLayer(String),
}
