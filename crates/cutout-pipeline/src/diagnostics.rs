//! Cutout diagnostics: timing and counts for each stage.
//!
//! Collected by [`cutout_with_diagnostics`](crate::cutout_with_diagnostics)
//! and [`cutout_encoded_with_diagnostics`](crate::cutout_encoded_with_diagnostics)
//! for parameter tuning and performance checks.
//!
//! Timestamps are captured via the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//! Durations are serialized as fractional seconds (`f64`) since
//! `std::time::Duration` does not implement serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single cutout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoutDiagnostics {
    /// Image decoding (only when the cutout started from encoded bytes).
    pub decode: Option<StageDiagnostics>,
    /// Stroke rasterization and seed collection.
    pub seed: StageDiagnostics,
    /// Region growing.
    pub grow: StageDiagnostics,
    /// Buffer split and PNG encoding.
    pub split: StageDiagnostics,
    /// Total wall-clock duration (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts.
    pub summary: CutoutSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },
    /// Seed collection metrics.
    Seed {
        /// `"click"` or `"brush"`.
        mode: String,
        /// Points in the stroke.
        stroke_points: usize,
        /// Brush diameter in pixels.
        stroke_width: f64,
        /// Number of seed pixels.
        seed_count: usize,
        /// Rounded mean seed color.
        mean_rgb: [u8; 3],
        /// Whether the single-point fallback was used.
        fallback: bool,
    },
    /// Region growing metrics.
    Grow {
        /// Full-selection distance.
        tolerance: f64,
        /// Feather band width.
        soft_edge: f64,
        /// Pixels with selection 1.0.
        full_count: usize,
        /// Pixels with partial selection.
        partial_count: usize,
        /// Total pixels in the image.
        total_pixel_count: usize,
    },
    /// Split and encode metrics.
    Split {
        /// Encoded extracted-layer size.
        extracted_bytes: usize,
        /// Encoded hole-mask size.
        hole_mask_bytes: usize,
    },
}

/// High-level summary for the whole cutout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoutSummary {
    /// Image width in pixels.
    pub image_width: u32,
    /// Image height in pixels.
    pub image_height: u32,
    /// Pixels with any selection.
    pub selected_count: usize,
    /// Fraction of the image with any selection.
    pub coverage: f64,
}

impl CutoutDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Cutout Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{}",
            self.summary.image_width, self.summary.image_height,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<12} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let mut stages: Vec<(&str, &StageDiagnostics)> = Vec::new();
        if let Some(ref decode) = self.decode {
            stages.push(("Decode", decode));
        }
        stages.push(("Seed", &self.seed));
        stages.push(("Grow", &self.grow));
        stages.push(("Split", &self.split));

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<12} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Selected pixels: {} ({:.1}% of image)",
            self.summary.selected_count,
            self.summary.coverage * 100.0,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            width,
            height,
        } => format!("{input_bytes} bytes -> {width}x{height}"),
        StageMetrics::Seed {
            mode,
            stroke_points,
            stroke_width,
            seed_count,
            mean_rgb,
            fallback,
        } => {
            let fallback = if *fallback { " (fallback)" } else { "" };
            format!(
                "{mode} {stroke_points} pts w={stroke_width:.1} -> {seed_count} seeds{fallback}, mean rgb({}, {}, {})",
                mean_rgb[0], mean_rgb[1], mean_rgb[2],
            )
        }
        StageMetrics::Grow {
            tolerance,
            soft_edge,
            full_count,
            partial_count,
            total_pixel_count,
        } => {
            format!(
                "tol={tolerance:.1} soft={soft_edge:.1} full={full_count} partial={partial_count} of {total_pixel_count}",
            )
        }
        StageMetrics::Split {
            extracted_bytes,
            hole_mask_bytes,
        } => format!("extracted {extracted_bytes} bytes, hole mask {hole_mask_bytes} bytes"),
    }
}

/// Fraction of `total` that `count` represents.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
