//! sRGB to CIE Lab conversion and CIE76 color difference.
//!
//! Region growing compares colors in Lab because equal Lab distances
//! are roughly equally noticeable, unlike distances in raw RGB.

use serde::{Deserialize, Serialize};

/// D65 reference white in CIE XYZ (Y normalized to 1).
pub const D65_WHITE: [f64; 3] = [0.950_47, 1.0, 1.088_83];

/// Linear sRGB to XYZ matrix (rows produce X, Y, Z).
const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

/// Below this normalized XYZ value the Lab transfer function is linear.
const LAB_EPSILON: f64 = 0.008_856;

/// A color in CIE L*a*b* space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    /// Lightness, roughly 0 (black) to 100 (white).
    pub l: f64,
    /// Green (negative) to red (positive).
    pub a: f64,
    /// Blue (negative) to yellow (positive).
    pub b: f64,
}

impl LabColor {
    /// Create a new Lab color.
    #[must_use]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// CIE76 ΔE to another color.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        distance(self, other)
    }
}

/// Convert an 8-bit sRGB triple to Lab.
#[must_use]
pub fn to_lab(r: u8, g: u8, b: u8) -> LabColor {
    let rgb = [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)];

    let xyz: [f64; 3] = std::array::from_fn(|row| {
        let m = SRGB_TO_XYZ[row];
        m[0].mul_add(rgb[0], m[1].mul_add(rgb[1], m[2] * rgb[2])) / D65_WHITE[row]
    });

    let fx = lab_f(xyz[0]);
    let fy = lab_f(xyz[1]);
    let fz = lab_f(xyz[2]);

    LabColor {
        l: 116.0f64.mul_add(fy, -16.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Euclidean distance between two Lab colors (CIE76 ΔE).
#[must_use]
pub fn distance(a: LabColor, b: LabColor) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    dl.mul_add(dl, da.mul_add(da, db * db)).sqrt()
}

/// Undo the sRGB transfer curve for one channel.
fn srgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c > 0.040_45 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// Lab companding: cube root above [`LAB_EPSILON`], linear below.
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787f64.mul_add(t, 16.0 / 116.0)
    }
}
