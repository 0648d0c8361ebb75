use super::*;

#[test]
fn position_patch_moves_layer() {
    let mut l = Layer::text("t", 0.0, 0.0, 30.0, 500.0);
    LayerPatch::position(60.0, 80.0).apply(&mut l).unwrap();
    assert_eq!((l.x, l.y), (60.0, 80.0));
}

#[test]
fn rejected_patch_leaves_layer_untouched() {
    let mut l = Layer::text("t", 10.0, 10.0, 30.0, 500.0);
    let before = l.clone();
    let patch = LayerPatch {
        x: Some(99.0),
        font_size_px: Some(f64::INFINITY),
        ..LayerPatch::default()
    };
    assert!(patch.apply(&mut l).is_err());
    assert_eq!(l, before);
}

#[test]
fn text_only_fields_rejected_on_images() {
    let mut img = Layer::image("k", 0.0, 0.0, 100.0, 100.0);
    let patch = LayerPatch {
        fill: Some("#ffffff".to_string()),
        ..LayerPatch::default()
    };
    assert!(patch.apply(&mut img).is_err());
}

#[test]
fn height_rejected_on_text() {
    let mut l = Layer::text("t", 0.0, 0.0, 30.0, 500.0);
    let patch = LayerPatch {
        height: Some(40.0),
        ..LayerPatch::default()
    };
    assert!(patch.apply(&mut l).is_err());
}

#[test]
fn text_patch_updates_typography() {
    let mut l = Layer::disclaimer("old", 0.0, 0.0, 20.0, 500.0);
    let patch = LayerPatch {
        font_size_px: Some(26.0),
        fill: Some("#FFF".to_string()),
        text: Some("Please drink responsibly.".to_string()),
        ..LayerPatch::default()
    };
    patch.apply(&mut l).unwrap();
    let body = l.text_body().unwrap();
    assert_eq!(body.font_size_px, 26.0);
    assert_eq!(body.fill.as_str(), "#ffffff");
    assert_eq!(body.text, "Please drink responsibly.");
    assert!(l.is_disclaimer());
}

#[test]
fn parse_number_rejects_non_numeric_input() {
    assert_eq!(LayerPatch::parse_number("x", " 12.5 ").unwrap(), 12.5);
    assert!(LayerPatch::parse_number("x", "").is_err());
    assert!(LayerPatch::parse_number("x", "abc").is_err());
    assert!(LayerPatch::parse_number("x", "NaN").is_err());
    assert!(LayerPatch::parse_number("x", "inf").is_err());
}
