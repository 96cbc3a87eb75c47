//! Incremental cutout: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! ```rust
//! # use cutout_pipeline::{CutoutConfig, CutoutError, Gesture, Pipeline, Point};
//! # fn run(png: Vec<u8>) -> Result<(), CutoutError> {
//! let gesture = Gesture::Click(Point::new(12.0, 8.0));
//! let staged = Pipeline::new(png, gesture, CutoutConfig::default())
//!     .decode()?
//!     .seed()?
//!     .grow()
//!     .split()?
//!     .into_result();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state, carrying
//! every previously computed intermediate. Callers that already hold
//! decoded pixels can start from [`Pipeline::from_image`].

use crate::grow::{GrowParams, SelectionMap, grow_region};
use crate::seed::{Seeds, rasterize_stroke, seeds_from_mask};
use crate::split::{SplitBuffers, split_layer};
use crate::types::{
    CutoutConfig, CutoutError, CutoutOutput, Dimensions, Gesture, GrayImage, RgbaImage, Stroke,
};

/// Entry points for the staged cutout.
pub struct Pipeline;

impl Pipeline {
    /// Start from encoded image bytes.
    ///
    /// Nothing is decoded yet; call [`.decode()`](Pending::decode) to
    /// begin.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(source: Vec<u8>, gesture: Gesture, config: CutoutConfig) -> Pending {
        Pending {
            config,
            gesture,
            source,
        }
    }

    /// Start from an already-decoded image, skipping the decode stage.
    pub const fn from_image(original: RgbaImage, gesture: Gesture, config: CutoutConfig) -> Decoded {
        Decoded {
            config,
            gesture,
            original,
            source_len: None,
        }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// State before any processing.
#[must_use = "pipeline stages are consumed by advancing; call .decode() to continue"]
pub struct Pending {
    config: CutoutConfig,
    gesture: Gesture,
    source: Vec<u8>,
}

impl Pending {
    /// The raw source image bytes.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Decode the source image and advance to [`Decoded`].
    ///
    /// # Errors
    ///
    /// Returns [`CutoutError::EmptyInput`] if the bytes are empty or the
    /// image has no pixels. Returns [`CutoutError::ImageDecode`] if the
    /// format is unrecognized or the data is corrupt.
    pub fn decode(self) -> Result<Decoded, CutoutError> {
        let original = crate::codec::decode(&self.source)?;
        Ok(Decoded {
            config: self.config,
            gesture: self.gesture,
            original,
            source_len: Some(self.source.len()),
        })
    }
}

// ───────────────────────── Stage 1: Decoded ──────────────────────────

/// State after decoding: RGBA pixels are available.
#[must_use = "pipeline stages are consumed by advancing; call .seed() to continue"]
pub struct Decoded {
    config: CutoutConfig,
    gesture: Gesture,
    original: RgbaImage,
    source_len: Option<usize>,
}

impl Decoded {
    /// The decoded RGBA image.
    #[must_use]
    pub const fn original(&self) -> &RgbaImage {
        &self.original
    }

    /// Size of the encoded input, if the pipeline started from bytes.
    #[must_use]
    pub const fn source_len(&self) -> Option<usize> {
        self.source_len
    }

    /// Render the gesture and collect seeds, advancing to [`Seeded`].
    ///
    /// # Errors
    ///
    /// Returns [`CutoutError::InvalidConfig`] if the configuration is out
    /// of range, [`CutoutError::EmptyInput`] for a zero-area image, and
    /// [`CutoutError::EmptySeed`] for a brush stroke with no points.
    pub fn seed(self) -> Result<Seeded, CutoutError> {
        self.config.validate()?;
        let stroke = self.gesture.to_stroke(&self.config);
        let stroke_mask = rasterize_stroke(&stroke, Dimensions::of(&self.original));
        let seeds = seeds_from_mask(
            &self.original,
            &stroke_mask,
            &stroke,
            self.config.seed_threshold,
        )?;
        Ok(Seeded {
            config: self.config,
            gesture: self.gesture,
            original: self.original,
            stroke,
            stroke_mask,
            seeds,
        })
    }
}

// ───────────────────────── Stage 2: Seeded ───────────────────────────

/// State after seed collection.
#[must_use = "pipeline stages are consumed by advancing; call .grow() to continue"]
pub struct Seeded {
    config: CutoutConfig,
    gesture: Gesture,
    original: RgbaImage,
    stroke: Stroke,
    stroke_mask: GrayImage,
    seeds: Seeds,
}

impl Seeded {
    /// The stroke the gesture resolved to.
    #[must_use]
    pub const fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    /// Rendered stroke mask the seeds were read from.
    #[must_use]
    pub const fn stroke_mask(&self) -> &GrayImage {
        &self.stroke_mask
    }

    /// Seed pixels and target color.
    #[must_use]
    pub const fn seeds(&self) -> &Seeds {
        &self.seeds
    }

    /// Grow the selection from the seeds, advancing to [`Grown`].
    pub fn grow(self) -> Grown {
        let selection = grow_region(
            &self.original,
            &self.seeds.indices,
            self.seeds.target,
            GrowParams::from(&self.config),
        );
        Grown {
            config: self.config,
            gesture: self.gesture,
            original: self.original,
            stroke: self.stroke,
            stroke_mask: self.stroke_mask,
            seeds: self.seeds,
            selection,
        }
    }
}

// ───────────────────────── Stage 3: Grown ────────────────────────────

/// State after region growing.
#[must_use = "pipeline stages are consumed by advancing; call .split() to continue"]
pub struct Grown {
    config: CutoutConfig,
    gesture: Gesture,
    original: RgbaImage,
    stroke: Stroke,
    stroke_mask: GrayImage,
    seeds: Seeds,
    selection: SelectionMap,
}

impl Grown {
    /// The per-pixel selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionMap {
        &self.selection
    }

    /// Build and encode the output layers, advancing to [`Split`].
    ///
    /// # Errors
    ///
    /// Returns [`CutoutError::ImageEncode`] if either output fails to
    /// encode.
    pub fn split(self) -> Result<Split, CutoutError> {
        let buffers = split_layer(&self.original, &self.selection)?;
        let output = buffers.encode()?;
        Ok(Split {
            config: self.config,
            gesture: self.gesture,
            original: self.original,
            stroke: self.stroke,
            stroke_mask: self.stroke_mask,
            seeds: self.seeds,
            selection: self.selection,
            buffers,
            output,
        })
    }
}

// ───────────────────────── Stage 4: Split ────────────────────────────

/// Final state: both output images are encoded.
#[must_use = "call .into_result() to extract the StagedCutout"]
pub struct Split {
    config: CutoutConfig,
    gesture: Gesture,
    original: RgbaImage,
    stroke: Stroke,
    stroke_mask: GrayImage,
    seeds: Seeds,
    selection: SelectionMap,
    buffers: SplitBuffers,
    output: CutoutOutput,
}

impl Split {
    /// The encoded outputs.
    #[must_use]
    pub const fn output(&self) -> &CutoutOutput {
        &self.output
    }

    /// Consume the pipeline and return every intermediate.
    #[must_use]
    pub fn into_result(self) -> StagedCutout {
        StagedCutout {
            config: self.config,
            gesture: self.gesture,
            original: self.original,
            stroke: self.stroke,
            stroke_mask: self.stroke_mask,
            seeds: self.seeds,
            selection: self.selection,
            buffers: self.buffers,
            output: self.output,
        }
    }
}

/// Every intermediate of a completed cutout.
#[derive(Debug, Clone)]
pub struct StagedCutout {
    /// Configuration the cutout ran with.
    pub config: CutoutConfig,
    /// The input gesture.
    pub gesture: Gesture,
    /// Decoded source pixels.
    pub original: RgbaImage,
    /// Stroke the gesture resolved to.
    pub stroke: Stroke,
    /// Rendered stroke mask.
    pub stroke_mask: GrayImage,
    /// Seeds and target color.
    pub seeds: Seeds,
    /// Grown selection.
    pub selection: SelectionMap,
    /// Unencoded output buffers.
    pub buffers: SplitBuffers,
    /// Encoded output.
    pub output: CutoutOutput,
}
