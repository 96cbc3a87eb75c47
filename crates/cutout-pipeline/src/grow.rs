//! Seeded region growing with a soft-edge falloff.
//!
//! Breadth-first growth from the seed pixels over 4-connected
//! neighbors. Each newly reached pixel is scored by its CIE76 distance
//! `d` to the target color:
//!
//! - `d <= tolerance`: fully selected (1.0), growth continues.
//! - `tolerance < d < tolerance + soft_edge`: partially selected with a
//!   linear falloff `1 - (d - tolerance) / soft_edge`; growth continues
//!   only while the selection exceeds `growth_cutoff`.
//! - otherwise: left at 0 and growth stops.
//!
//! Each pixel is visited at most once, so only pixels connected to a
//! seed through accepted pixels can end up with a non-zero selection.

use std::collections::VecDeque;

use image::RgbaImage;

use crate::color::{LabColor, to_lab};
use crate::types::Dimensions;

/// Neighbor offsets in visit order: right, left, down, up.
const NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Distance thresholds for [`grow_region`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowParams {
    /// Full-selection distance.
    pub tolerance: f64,
    /// Feather band width beyond `tolerance`.
    pub soft_edge: f64,
    /// Partial selections at or below this value do not propagate.
    pub growth_cutoff: f64,
}

impl GrowParams {
    /// Selection value for a pixel at distance `d` from the target.
    ///
    /// A zero-width band degenerates to a hard cutoff at `tolerance`.
    #[must_use]
    pub fn falloff(&self, d: f64) -> f64 {
        if d <= self.tolerance {
            1.0
        } else if d >= self.tolerance + self.soft_edge {
            0.0
        } else {
            1.0 - (d - self.tolerance) / self.soft_edge
        }
    }
}

impl From<&crate::CutoutConfig> for GrowParams {
    fn from(config: &crate::CutoutConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            soft_edge: config.soft_edge,
            growth_cutoff: config.growth_cutoff,
        }
    }
}

/// Per-pixel fractional membership in the extracted region.
///
/// Values are in `[0.0, 1.0]`, row-major, one per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMap {
    dimensions: Dimensions,
    values: Vec<f32>,
}

impl SelectionMap {
    /// An all-zero map.
    #[must_use]
    pub fn empty(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            values: vec![0.0; dimensions.pixel_count()],
        }
    }

    /// Map dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// All values, row-major.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Selection at pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the map.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.dimensions.width as usize + x as usize]
    }

    /// Count of fully and partially selected pixels.
    #[must_use]
    pub fn stats(&self) -> SelectionStats {
        let mut stats = SelectionStats::default();
        for &v in &self.values {
            if v >= 1.0 {
                stats.full += 1;
            } else if v > 0.0 {
                stats.partial += 1;
            }
        }
        stats
    }
}

/// Summary of a [`SelectionMap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    /// Pixels with selection 1.0.
    pub full: usize,
    /// Pixels with selection strictly between 0 and 1.
    pub partial: usize,
}

/// Grow a selection from `seeds` toward pixels close to `target`.
///
/// Seeds are always fully selected; out-of-range and duplicate seed
/// indices are ignored. The result depends only on the inputs.
#[must_use = "returns the selection map"]
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
pub fn grow_region(
    image: &RgbaImage,
    seeds: &[usize],
    target: LabColor,
    params: GrowParams,
) -> SelectionMap {
    let dimensions = Dimensions::of(image);
    let mut map = SelectionMap::empty(dimensions);
    let pixel_count = dimensions.pixel_count();
    let width = i64::from(dimensions.width);
    let height = i64::from(dimensions.height);

    let mut visited = vec![false; pixel_count];
    let mut queue = VecDeque::with_capacity(seeds.len());

    for &seed in seeds {
        if seed < pixel_count && !visited[seed] {
            visited[seed] = true;
            map.values[seed] = 1.0;
            queue.push_back(seed);
        }
    }

    while let Some(current) = queue.pop_front() {
        let cx = current as i64 % width;
        let cy = current as i64 / width;

        for (dx, dy) in NEIGHBORS {
            let nx = cx + dx;
            let ny = cy + dy;
            if nx < 0 || nx >= width || ny < 0 || ny >= height {
                continue;
            }
            let n = (ny * width + nx) as usize;
            if visited[n] {
                continue;
            }
            visited[n] = true;

            let [r, g, b, _] = image.get_pixel(nx as u32, ny as u32).0;
            let d = to_lab(r, g, b).distance(target);
            let selection = params.falloff(d);
            if selection <= 0.0 {
                continue;
            }

            map.values[n] = selection as f32;
            if selection >= 1.0 || selection > params.growth_cutoff {
                queue.push_back(n);
            }
        }
    }

    let stats = map.stats();
    log::debug!(
        "region grown over {dimensions}: {} full, {} partial",
        stats.full,
        stats.partial,
    );
    map
}
