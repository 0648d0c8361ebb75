use super::*;

#[test]
fn generated_ids_are_unique() {
    let a = LayerId::generate();
    let b = LayerId::generate();
    assert_ne!(a, b);
    assert!(!a.as_str().is_empty());
}

#[test]
fn text_height_is_two_lines_of_leading() {
    let l = Layer::text("Mega Offer", 0.0, 0.0, 18.0, 918.0);
    assert_eq!(l.size(), (918.0, 45.0));
    let tiny = Layer::text("x", 0.0, 0.0, 0.1, 10.0);
    assert_eq!(tiny.size().1, 1.0);
}

#[test]
fn bbox_uses_rotation_about_top_left() {
    let l = Layer::image("k", 100.0, 100.0, 200.0, 100.0).with_rotation(90.0);
    let b = l.bbox();
    assert!((b.x - 0.0).abs() < 1e-9);
    assert!((b.y - 100.0).abs() < 1e-9);
    assert!((b.w - 100.0).abs() < 1e-9);
    assert!((b.h - 200.0).abs() < 1e-9);
}

#[test]
fn kinds_expose_text_payload() {
    assert!(Layer::image("k", 0.0, 0.0, 1.0, 1.0).text_body().is_none());
    let d = Layer::disclaimer("Please drink responsibly.", 0.0, 0.0, 26.0, 700.0);
    assert!(d.is_disclaimer());
    assert_eq!(d.text_body().unwrap().font_size_px, 26.0);
    assert!(!Layer::text("t", 0.0, 0.0, 26.0, 700.0).is_disclaimer());
}

#[test]
fn validate_rejects_non_finite_and_negative_values() {
    let mut l = Layer::text("t", 0.0, 0.0, 26.0, 700.0);
    l.validate().unwrap();
    l.x = f64::NAN;
    assert!(l.validate().is_err());

    let mut img = Layer::image("k", 0.0, 0.0, 10.0, 10.0);
    img.kind = LayerKind::Image(ImageBody {
        src: "k".to_string(),
        width: -1.0,
        height: 10.0,
    });
    assert!(img.validate().is_err());

    let zero_font = Layer::text("t", 0.0, 0.0, 0.0, 700.0);
    assert!(zero_font.validate().is_err());
}

#[test]
fn json_shape_is_flat_and_tagged() {
    let json = r##"{
        "id": "headline",
        "x": 0,
        "y": 0,
        "kind": "text",
        "text": "Mega Offer",
        "fontSizePx": 18,
        "fill": "#9CA3AF",
        "width": 918
    }"##;
    let l: Layer = serde_json::from_str(json).unwrap();
    assert_eq!(l.id, LayerId::new("headline"));
    assert_eq!(l.rotation, 0.0);
    let body = l.text_body().unwrap();
    assert_eq!(body.font_size_px, 18.0);
    assert_eq!(body.fill.as_str(), "#9ca3af");

    let back = serde_json::to_value(&l).unwrap();
    assert_eq!(back["kind"], "text");
    assert_eq!(back["fontSizePx"], 18.0);
}
