use super::*;
use crate::catalog::format::{Format, FormatKey};
use crate::export::surface::EncodeRequest;
use crate::foundation::core::Rect;
use crate::layer::model::Layer;

const KIB: usize = 1024;
const BUDGET: usize = 500 * KIB;

/// Surface whose encoded size is a pure function of codec and quality.
struct SizedSurface {
    size: fn(Codec, Option<Quality>) -> usize,
    calls: Vec<(Codec, Option<u8>)>,
}

impl SizedSurface {
    fn new(size: fn(Codec, Option<Quality>) -> usize) -> Self {
        Self {
            size,
            calls: Vec::new(),
        }
    }
}

impl RenderSurface for SizedSurface {
    fn present(&mut self, format: &Format, _layers: &[Layer]) -> CreativeResult<SurfaceReady> {
        SurfaceReady::new(format, Rect::new(0.0, 0.0, 100.0, 100.0), 1.0)
    }

    fn encode(&mut self, _ready: &SurfaceReady, req: &EncodeRequest) -> CreativeResult<Vec<u8>> {
        self.calls
            .push((req.codec, req.quality.map(Quality::hundredths)));
        Ok(vec![0; (self.size)(req.codec, req.quality)])
    }
}

fn run(surface: &mut SizedSurface, codec: Codec) -> ExportOutcome {
    let ready = surface.present(&Format::get(FormatKey::Square), &[]).unwrap();
    export_within_budget(surface, &ready, codec, BUDGET, &QualityLadder::default()).unwrap()
}

#[test]
fn default_ladder_visits_expected_steps() {
    let steps: Vec<u8> = QualityLadder::default()
        .steps()
        .map(Quality::hundredths)
        .collect();
    assert_eq!(
        steps,
        [92, 86, 80, 74, 68, 62, 56, 50, 44, 38, 32, 26, 20]
    );
}

#[test]
fn fixed_size_surface_ends_at_floor_and_returns_over_budget_bytes() {
    let mut s = SizedSurface::new(|_, _| 600 * KIB);
    let out = run(&mut s, Codec::Jpeg);
    assert_eq!(out.codec, Codec::Jpeg);
    assert_eq!(out.quality.map(|q| q.to_string()), Some("0.2".to_string()));
    assert_eq!(out.len(), 600 * KIB);
    assert!(out.is_over(BUDGET));
    // Thirteen ladder steps plus the final encode at the floor.
    assert_eq!(s.calls.len(), 14);
    assert_eq!(s.calls.last(), Some(&(Codec::Jpeg, Some(20))));
}

#[test]
fn monotone_surface_stops_at_first_fitting_quality() {
    let mut s = SizedSurface::new(|_, q| {
        let q = q.map_or(100, Quality::hundredths);
        if q <= 80 { 450 * KIB } else { 520 * KIB }
    });
    let out = run(&mut s, Codec::Jpeg);
    assert_eq!(out.quality.map(|q| q.to_string()), Some("0.8".to_string()));
    assert_eq!(out.len(), 450 * KIB);
    assert_eq!(s.calls.len(), 3);
}

#[test]
fn exact_budget_counts_as_within() {
    let mut s = SizedSurface::new(|_, _| BUDGET);
    let out = run(&mut s, Codec::Jpeg);
    assert_eq!(out.quality, Quality::from_hundredths(92).ok());
    assert!(!out.is_over(BUDGET));
}

#[test]
fn small_png_is_returned_without_quality() {
    let mut s = SizedSurface::new(|_, _| 100 * KIB);
    let out = run(&mut s, Codec::Png);
    assert_eq!(out.codec, Codec::Png);
    assert_eq!(out.quality, None);
    assert_eq!(s.calls, [(Codec::Png, None)]);
}

#[test]
fn oversized_png_falls_back_to_jpeg() {
    let mut s = SizedSurface::new(|codec, q| match codec {
        Codec::Png => 900 * KIB,
        Codec::Jpeg if q.map_or(100, Quality::hundredths) <= 86 => 300 * KIB,
        Codec::Jpeg => 510 * KIB,
    });
    let out = run(&mut s, Codec::Png);
    assert_eq!(out.codec, Codec::Jpeg);
    assert_eq!(out.quality, Quality::from_hundredths(86).ok());
    assert_eq!(s.calls[0], (Codec::Png, None));
}

#[test]
fn surface_errors_propagate() {
    struct Broken;
    impl RenderSurface for Broken {
        fn present(&mut self, f: &Format, _: &[Layer]) -> CreativeResult<SurfaceReady> {
            SurfaceReady::new(f, Rect::new(0.0, 0.0, 1.0, 1.0), 1.0)
        }
        fn encode(&mut self, _: &SurfaceReady, _: &EncodeRequest) -> CreativeResult<Vec<u8>> {
            Err(CreativeError::surface_unavailable("stage detached"))
        }
    }
    let mut b = Broken;
    let ready = b.present(&Format::get(FormatKey::Story), &[]).unwrap();
    let err = export_within_budget(&mut b, &ready, Codec::Jpeg, BUDGET, &QualityLadder::default())
        .unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn ladder_validation() {
    let zero_step = QualityLadder {
        step: Quality::saturating(0),
        ..QualityLadder::default()
    };
    assert!(zero_step.validate().is_err());
    let inverted = QualityLadder {
        start: Quality::saturating(10),
        ..QualityLadder::default()
    };
    assert!(inverted.validate().is_err());
    assert!(QualityLadder::default().validate().is_ok());
}

#[test]
fn opts_defaults_and_json_overrides() {
    let opts = ExportOpts::default();
    assert_eq!(opts.byte_budget, 512_000);
    assert_eq!(opts.file_prefix, "BrandCanvasAI");

    let custom: ExportOpts =
        serde_json::from_str(r#"{"byteBudget": 2048, "ladder": {"start": 90}}"#).unwrap();
    assert_eq!(custom.byte_budget, 2048);
    assert_eq!(custom.ladder.start.hundredths(), 90);
    assert_eq!(custom.ladder.floor.hundredths(), 20);
    assert_eq!(custom.file_prefix, "BrandCanvasAI");

    let bad = ExportOpts {
        file_prefix: "../up".to_string(),
        ..ExportOpts::default()
    };
    assert!(bad.validate().is_err());
}
