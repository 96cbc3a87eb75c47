//! Shared types for the cutout pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference the
/// rasterized stroke mask without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// pixel buffers without depending on `image` directly.
pub use image::RgbaImage;

/// A 2D point in image pixel coordinates.
///
/// Coordinates need not be integral: pointer input maps to fractional
/// positions once the canvas transform has been undone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The pixel containing this point, clamped into a `width`×`height`
    /// image.
    ///
    /// Returns `None` for an empty image.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_pixel(self, dimensions: Dimensions) -> Option<(u32, u32)> {
        if dimensions.is_empty() {
            return None;
        }
        let clamp = |v: f64, extent: u32| -> u32 {
            if v.is_nan() || v <= 0.0 {
                0
            } else {
                (v.floor() as u32).min(extent - 1)
            }
        };
        Some((
            clamp(self.x, dimensions.width),
            clamp(self.y, dimensions.height),
        ))
    }
}

/// A raw user gesture: an ordered polyline plus a brush diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Points in drawing order.
    pub points: Vec<Point>,
    /// Brush diameter in pixels. Expected to be positive.
    pub width: f64,
}

impl Stroke {
    /// Create a new stroke.
    #[must_use]
    pub const fn new(points: Vec<Point>, width: f64) -> Self {
        Self { points, width }
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }
}

/// How the user marked the region to cut out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    /// A single click. Rendered as a one-point stroke of
    /// [`CutoutConfig::click_stroke_width`].
    Click(Point),
    /// A freehand brush stroke with its own diameter.
    Brush(Stroke),
}

impl Gesture {
    /// Resolve the gesture into the stroke that seeds the cutout.
    #[must_use]
    pub fn to_stroke(&self, config: &CutoutConfig) -> Stroke {
        match self {
            Self::Click(point) => Stroke::new(vec![*point], config.click_stroke_width),
            Self::Brush(stroke) => stroke.clone(),
        }
    }

    /// Short name used in logs and diagnostics.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Click(_) => "click",
            Self::Brush(_) => "brush",
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing image.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if either side is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Tunable parameters for a cutout.
///
/// Distances are CIE76 ΔE units in Lab space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoutConfig {
    /// Pixels within this distance of the seed color are fully selected.
    pub tolerance: f64,

    /// Width of the feather band beyond `tolerance`. Pixels inside the
    /// band receive a linearly decreasing partial selection.
    pub soft_edge: f64,

    /// Feathered pixels at or below this selection value are kept but
    /// do not propagate growth further.
    pub growth_cutoff: f64,

    /// Stroke mask intensity (0-255) that a scratch pixel must exceed to count
    /// as a seed.
    pub seed_threshold: u8,

    /// Brush diameter used for click gestures, in pixels.
    ///
    /// Fixed regardless of image resolution.
    pub click_stroke_width: f64,
}

impl CutoutConfig {
    /// Default full-selection distance.
    pub const DEFAULT_TOLERANCE: f64 = 25.0;
    /// Default feather band width.
    pub const DEFAULT_SOFT_EDGE: f64 = 10.0;
    /// Default growth-continuation cutoff.
    pub const DEFAULT_GROWTH_CUTOFF: f64 = 0.1;
    /// Default seed intensity threshold.
    pub const DEFAULT_SEED_THRESHOLD: u8 = 128;
    /// Brush diameter for click gestures.
    pub const CLICK_STROKE_WIDTH: f64 = 20.0;

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CutoutError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), CutoutError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(CutoutError::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        if !self.soft_edge.is_finite() || self.soft_edge < 0.0 {
            return Err(CutoutError::InvalidConfig(format!(
                "soft_edge must be finite and non-negative, got {}",
                self.soft_edge
            )));
        }
        if !(0.0..1.0).contains(&self.growth_cutoff) {
            return Err(CutoutError::InvalidConfig(format!(
                "growth_cutoff must be in [0, 1), got {}",
                self.growth_cutoff
            )));
        }
        if !self.click_stroke_width.is_finite() || self.click_stroke_width <= 0.0 {
            return Err(CutoutError::InvalidConfig(format!(
                "click_stroke_width must be positive, got {}",
                self.click_stroke_width
            )));
        }
        Ok(())
    }
}

impl Default for CutoutConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            soft_edge: Self::DEFAULT_SOFT_EDGE,
            growth_cutoff: Self::DEFAULT_GROWTH_CUTOFF,
            seed_threshold: Self::DEFAULT_SEED_THRESHOLD,
            click_stroke_width: Self::CLICK_STROKE_WIDTH,
        }
    }
}

/// The two encoded images a cutout produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoutOutput {
    /// PNG of the extracted region: original colors, selection as alpha.
    pub extracted: Vec<u8>,
    /// PNG hole mask for the original layer: white shows, black hides.
    pub hole_mask: Vec<u8>,
    /// Pixel dimensions shared by both images.
    pub dimensions: Dimensions,
}

/// Errors that can occur during a cutout or a mask bake.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. The image variants are serialized
/// as their `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum CutoutError {
    /// Failed to decode an input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// Failed to encode an output image.
    #[error("failed to encode image: {0}")]
    ImageEncode(#[source] image::ImageError),

    /// The input image bytes were empty or the image has no pixels.
    #[error("input image is empty")]
    EmptyInput,

    /// The gesture carried no points to seed from.
    #[error("stroke has no points to seed the cutout from")]
    EmptySeed,

    /// Mask and source image sizes differ.
    #[error("mask is {mask} but source image is {image}")]
    DimensionMismatch {
        /// Source image dimensions.
        image: Dimensions,
        /// Mask image dimensions.
        mask: Dimensions,
    },

    /// Configuration is out of range.
    #[error("invalid cutout configuration: {0}")]
    InvalidConfig(String),

    /// An error restored from its serialized form.
    ///
    /// Only produced by deserialization: the original `image` error
    /// cannot be reconstructed, but its message is kept.
    #[error("{0}")]
    Remote(String),
}

/// Serde-compatible proxy for `CutoutError`.
#[derive(Serialize, Deserialize)]
enum CutoutErrorProxy {
    ImageDecode(String),
    ImageEncode(String),
    EmptyInput,
    EmptySeed,
    DimensionMismatch { image: Dimensions, mask: Dimensions },
    InvalidConfig(String),
    Remote(String),
}

impl Serialize for CutoutError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::ImageDecode(e) => CutoutErrorProxy::ImageDecode(e.to_string()),
            Self::ImageEncode(e) => CutoutErrorProxy::ImageEncode(e.to_string()),
            Self::EmptyInput => CutoutErrorProxy::EmptyInput,
            Self::EmptySeed => CutoutErrorProxy::EmptySeed,
            Self::DimensionMismatch { image, mask } => CutoutErrorProxy::DimensionMismatch {
                image: *image,
                mask: *mask,
            },
            Self::InvalidConfig(s) => CutoutErrorProxy::InvalidConfig(s.clone()),
            Self::Remote(s) => CutoutErrorProxy::Remote(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CutoutError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = CutoutErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            CutoutErrorProxy::ImageDecode(msg) => {
                Self::Remote(format!("failed to decode image: {msg}"))
            }
            CutoutErrorProxy::ImageEncode(msg) => {
                Self::Remote(format!("failed to encode image: {msg}"))
            }
            CutoutErrorProxy::EmptyInput => Self::EmptyInput,
            CutoutErrorProxy::EmptySeed => Self::EmptySeed,
            CutoutErrorProxy::DimensionMismatch { image, mask } => {
                Self::DimensionMismatch { image, mask }
            }
            CutoutErrorProxy::InvalidConfig(s) => Self::InvalidConfig(s),
            CutoutErrorProxy::Remote(s) => Self::Remote(s),
        })
    }
}
