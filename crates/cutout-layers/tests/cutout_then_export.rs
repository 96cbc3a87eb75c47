//! Integration test: cut a region out of a layer, then export the stack
//! and check that the two exported files reassemble the original.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use cutout_layers::LayerStack;
use cutout_pipeline::codec::{decode, encode_png};
use cutout_pipeline::{CutoutConfig, Gesture, Point, Stroke};
use image::{Rgba, RgbaImage};

/// Orange disc on a teal background with a soft anti-aliased rim.
fn disc_on_teal() -> RgbaImage {
    RgbaImage::from_fn(32, 32, |x, y| {
        let dx = f64::from(x) + 0.5 - 16.0;
        let dy = f64::from(y) + 0.5 - 16.0;
        let t = ((dx * dx + dy * dy).sqrt() - 9.0).clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
        Rgba([mix(240, 20), mix(140, 150), mix(20, 140), 255])
    })
}

#[test]
fn exported_base_and_extracted_reassemble_the_original() {
    let original = disc_on_teal();
    let mut stack = LayerStack::new();
    let id = stack.push_image("Disc", encode_png(&original).unwrap(), 32.0, 32.0);

    let gesture = Gesture::Brush(Stroke::new(
        vec![Point::new(12.0, 16.0), Point::new(20.0, 16.0)],
        5.0,
    ));
    let part = stack
        .cutout(&id, &gesture, &CutoutConfig::default())
        .expect("cutout should succeed");

    let exported = stack.export();
    assert_eq!(exported.len(), 2);
    let files: Vec<_> = exported
        .into_iter()
        .map(|(layer_id, result)| (layer_id, result.unwrap()))
        .collect();
    assert_eq!(files[0].0, id);
    assert_eq!(files[0].1.file_name, "Disc (Base).png");
    assert_eq!(files[1].0, part);
    assert_eq!(files[1].1.file_name, "Disc (Extracted).png");
    assert!(files[0].1.baked);
    assert!(!files[1].1.baked);

    let base = decode(&files[0].1.bytes).unwrap();
    let extracted = decode(&files[1].1.bytes).unwrap();

    // Disc center is taken, far corner stays on the base.
    assert_eq!(extracted.get_pixel(16, 16).0[3], 255);
    assert_eq!(base.get_pixel(16, 16).0[3], 0);
    assert_eq!(extracted.get_pixel(0, 0).0[3], 0);
    assert_eq!(base.get_pixel(0, 0).0[3], 255);

    for ((b, e), o) in base.pixels().zip(extracted.pixels()).zip(original.pixels()) {
        let sum = u16::from(b.0[3]) + u16::from(e.0[3]);
        assert!(sum == 254 || sum == 255, "alpha sum {sum}");
        assert_eq!(b.0[..3], o.0[..3]);
        assert_eq!(e.0[..3], o.0[..3]);
    }
}

#[test]
fn second_cutout_replaces_the_base_mask() {
    let mut stack = LayerStack::new();
    let id = stack.push_image("Disc", encode_png(&disc_on_teal()).unwrap(), 32.0, 32.0);
    let config = CutoutConfig::default();

    stack
        .cutout(&id, &Gesture::Click(Point::new(16.0, 16.0)), &config)
        .unwrap();
    // Cutting the teal background from the base reads its unmasked source.
    stack
        .cutout(&id, &Gesture::Click(Point::new(2.0, 2.0)), &config)
        .unwrap();

    let names: Vec<&str> = stack.layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Disc (Extracted)",
            "Disc (Base) (Base)",
            "Disc (Base) (Extracted)",
        ]
    );

    let base = stack.get(&id).unwrap();
    let mask = decode(base.erase_mask_image.as_ref().unwrap()).unwrap();
    // The new mask hides the background and shows the disc again.
    assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    assert_eq!(mask.get_pixel(16, 16).0[0], 255);
}
