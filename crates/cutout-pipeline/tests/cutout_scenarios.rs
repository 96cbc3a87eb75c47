//! Integration tests: run synthetic layers through the full cutout and
//! check the outputs against the compositing contract.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use cutout_pipeline::codec::{decode, encode_png};
use cutout_pipeline::{
    CutoutConfig, CutoutError, Gesture, Pipeline, Point, RgbaImage, StageMetrics, Stroke, bake,
    cutout, cutout_encoded, cutout_encoded_with_diagnostics,
};
use image::Rgba;

/// 40x20 image: pale sky on the left half, dark ground on the right.
fn sky_and_ground() -> RgbaImage {
    RgbaImage::from_fn(40, 20, |x, _| {
        if x < 20 {
            Rgba([180, 210, 240, 255])
        } else {
            Rgba([40, 30, 20, 255])
        }
    })
}

/// 64x4 horizontal gray ramp from black.
fn gray_ramp() -> RgbaImage {
    RgbaImage::from_fn(64, 4, |x, _| {
        #[allow(clippy::cast_possible_truncation)]
        let v = (x * 4) as u8;
        Rgba([v, v, v, 255])
    })
}

fn brush(points: &[(f64, f64)], width: f64) -> Gesture {
    Gesture::Brush(Stroke::new(
        points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        width,
    ))
}

#[test]
fn brush_extracts_only_the_stroked_region() {
    let image = sky_and_ground();
    let gesture = brush(&[(4.0, 10.0), (12.0, 10.0)], 4.0);
    let output = cutout(&image, &gesture, &CutoutConfig::default()).unwrap();

    let extracted = decode(&output.extracted).unwrap();
    let hole = decode(&output.hole_mask).unwrap();
    for (x, y, p) in extracted.enumerate_pixels() {
        let (alpha, hole_v) = if x < 20 { (255, 0) } else { (0, 255) };
        assert_eq!(p.0[3], alpha, "extracted alpha at ({x}, {y})");
        assert_eq!(hole.get_pixel(x, y).0, [hole_v, hole_v, hole_v, 255]);
    }
}

#[test]
fn click_beside_a_color_edge_takes_only_the_clicked_side() {
    // Red for x < 20, blue from x = 20; the click lands one pixel left
    // of the edge.
    let image = RgbaImage::from_fn(40, 20, |x, _| {
        if x < 20 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    let gesture = Gesture::Click(Point::new(18.5, 10.5));
    let staged = Pipeline::from_image(image, gesture, CutoutConfig::default())
        .seed()
        .unwrap()
        .grow()
        .split()
        .unwrap()
        .into_result();

    assert!(staged.seeds.fallback);
    assert_eq!(staged.seeds.indices, vec![10 * 40 + 18]);
    assert_eq!(staged.seeds.mean_rgb, [255, 0, 0]);

    for (x, y, p) in staged.buffers.extracted.enumerate_pixels() {
        let expected = if x < 20 { 255 } else { 0 };
        assert_eq!(p.0[3], expected, "({x}, {y})");
    }
}

#[test]
fn extracted_plus_masked_base_reassembles_the_layer() {
    let image = gray_ramp();
    let config = CutoutConfig {
        tolerance: 10.0,
        soft_edge: 40.0,
        ..CutoutConfig::default()
    };
    let gesture = brush(&[(0.0, 2.0), (3.0, 2.0)], 3.0);
    let output = cutout(&image, &gesture, &config).unwrap();

    let source_png = encode_png(&image).unwrap();
    let base = decode(&bake(&source_png, Some(&output.hole_mask)).unwrap()).unwrap();
    let extracted = decode(&output.extracted).unwrap();

    let mut feathered = 0;
    for ((e, b), s) in extracted.pixels().zip(base.pixels()).zip(image.pixels()) {
        let sum = u16::from(e.0[3]) + u16::from(b.0[3]);
        assert!(sum == 254 || sum == 255, "alpha sum {sum}");
        assert_eq!(e.0[..3], s.0[..3]);
        assert_eq!(b.0[..3], s.0[..3]);
        if e.0[3] > 0 && e.0[3] < 255 {
            feathered += 1;
        }
    }
    assert!(feathered > 0, "expected a soft edge on the ramp");
}

#[test]
fn feathering_falls_off_monotonically_from_the_seed() {
    let image = gray_ramp();
    let config = CutoutConfig {
        tolerance: 5.0,
        soft_edge: 30.0,
        growth_cutoff: 0.0,
        ..CutoutConfig::default()
    };
    let staged = Pipeline::from_image(image, brush(&[(0.5, 0.5)], 1.0), config)
        .seed()
        .unwrap()
        .grow()
        .split()
        .unwrap()
        .into_result();

    let row: Vec<f32> = (0..64).map(|x| staged.selection.get(x, 0)).collect();
    assert!((row[0] - 1.0).abs() < f32::EPSILON);
    assert!(row.windows(2).all(|w| w[0] >= w[1]), "{row:?}");
    assert!(row.iter().any(|&s| s > 0.0 && s < 1.0));
    assert!(row[63].abs() < f32::EPSILON);
}

#[test]
fn same_color_behind_a_barrier_is_not_selected() {
    // Two red squares separated by a black column.
    let image = RgbaImage::from_fn(9, 4, |x, _| {
        if x == 4 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([220, 20, 20, 255])
        }
    });
    let output = cutout(&image, &brush(&[(1.5, 1.5)], 2.0), &CutoutConfig::default()).unwrap();
    let extracted = decode(&output.extracted).unwrap();
    for (x, y, p) in extracted.enumerate_pixels() {
        let expected = if x < 4 { 255 } else { 0 };
        assert_eq!(p.0[3], expected, "({x}, {y})");
    }
}

#[test]
fn repeated_cutouts_are_identical() {
    let png = encode_png(&sky_and_ground()).unwrap();
    let gesture = Gesture::Click(Point::new(30.0, 5.0));
    let config = CutoutConfig::default();
    let first = cutout_encoded(&png, &gesture, &config).unwrap();
    let second = cutout_encoded(&png, &gesture, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn corrupt_input_reports_decode_error() {
    let result = cutout_encoded(
        b"definitely not an image",
        &Gesture::Click(Point::new(0.0, 0.0)),
        &CutoutConfig::default(),
    );
    assert!(matches!(result, Err(CutoutError::ImageDecode(_))));
}

#[test]
fn diagnostics_report_and_json() {
    let png = encode_png(&sky_and_ground()).unwrap();
    let (_, diagnostics) = cutout_encoded_with_diagnostics(
        &png,
        &Gesture::Click(Point::new(5.0, 5.0)),
        &CutoutConfig::default(),
    )
    .unwrap();

    assert_eq!(diagnostics.summary.selected_count, 400);
    assert!(matches!(
        diagnostics.seed.metrics,
        StageMetrics::Seed {
            seed_count: 1,
            fallback: true,
            ..
        }
    ));
    assert!((diagnostics.summary.coverage - 0.5).abs() < f64::EPSILON);

    let report = diagnostics.report();
    assert!(report.contains("Decode"));
    assert!(report.contains("click 1 pts"));

    let json = serde_json::to_string(&diagnostics).unwrap();
    assert!(json.contains("\"selected_count\":400"));
}
