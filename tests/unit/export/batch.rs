use super::*;
use crate::export::sink::InMemoryArtifacts;
use crate::export::surface::{EncodeRequest, Quality, SurfaceReady};
use crate::foundation::core::Rect;

const KIB: usize = 1024;

/// Records every presented format; sizes and failures are configured per format.
#[derive(Default)]
struct StageLog {
    presented: Vec<FormatKey>,
    size: Option<fn(FormatKey, Option<Quality>) -> usize>,
    fail_on: Option<FormatKey>,
}

impl RenderSurface for StageLog {
    fn present(&mut self, format: &Format, _layers: &[Layer]) -> CreativeResult<SurfaceReady> {
        self.presented.push(format.key);
        if self.fail_on == Some(format.key) {
            return Err(CreativeError::surface_unavailable("stage unmounted"));
        }
        SurfaceReady::new(format, Rect::new(0.0, 0.0, 10.0, 10.0), 1.0)
    }

    fn encode(&mut self, ready: &SurfaceReady, req: &EncodeRequest) -> CreativeResult<Vec<u8>> {
        let size = self.size.map_or(10 * KIB, |f| f(ready.format(), req.quality));
        Ok(vec![7; size])
    }
}

fn all_formats() -> Vec<Format> {
    Format::all()
}

fn job<'a>(formats: &'a [Format], opts: &'a ExportOpts, codec: Codec) -> ExportJob<'a> {
    ExportJob {
        formats,
        layers: &[],
        restore_to: Format::get(FormatKey::Story),
        codec,
        opts,
    }
}

#[test]
fn names_and_summaries() {
    assert_eq!(
        artifact_name("BrandCanvasAI", FormatKey::Landscape, Codec::Jpeg),
        "BrandCanvasAI_LANDSCAPE_1_91_1.jpg"
    );
    let lossless = ExportOutcome {
        bytes: vec![0; 1536],
        codec: Codec::Png,
        quality: None,
    };
    assert_eq!(
        summary_line(FormatKey::Square, &lossless, 500 * KIB),
        "SQUARE_1_1: 2 KB OK"
    );
    let lossy = ExportOutcome {
        bytes: vec![0; 600 * KIB],
        codec: Codec::Jpeg,
        quality: Quality::from_hundredths(20).ok(),
    };
    assert_eq!(
        summary_line(FormatKey::Story, &lossy, 500 * KIB),
        "STORY_9_16: 600 KB OVER q=0.2"
    );
}

#[test]
fn batch_exports_in_order_and_restores() {
    let formats = all_formats();
    let opts = ExportOpts::default();
    let mut surface = StageLog::default();
    let mut sink = InMemoryArtifacts::new();

    let report = Exporter::new()
        .export_all_formats(&job(&formats, &opts, Codec::Png), &mut surface, &mut sink)
        .unwrap();

    assert_eq!(
        surface.presented,
        [
            FormatKey::Square,
            FormatKey::Story,
            FormatKey::Landscape,
            FormatKey::Story
        ]
    );
    assert_eq!(
        sink.names(),
        [
            "BrandCanvasAI_SQUARE_1_1.png",
            "BrandCanvasAI_STORY_9_16.png",
            "BrandCanvasAI_LANDSCAPE_1_91_1.png"
        ]
    );
    assert_eq!(
        report.summary_lines(),
        [
            "SQUARE_1_1: 10 KB OK",
            "STORY_9_16: 10 KB OK",
            "LANDSCAPE_1_91_1: 10 KB OK"
        ]
    );
    assert!(report.all_within_budget());
    assert_eq!(report.byte_budget, 500 * KIB);
}

#[test]
fn over_budget_formats_still_deliver_and_restore() {
    let formats = all_formats();
    let opts = ExportOpts::default();
    let mut surface = StageLog {
        size: Some(|key, _| match key {
            FormatKey::Story => 600 * KIB,
            _ => 100 * KIB,
        }),
        ..StageLog::default()
    };
    let mut sink = InMemoryArtifacts::new();

    let report = Exporter::new()
        .export_all_formats(&job(&formats, &opts, Codec::Jpeg), &mut surface, &mut sink)
        .unwrap();

    assert_eq!(surface.presented.last(), Some(&FormatKey::Story));
    assert!(!report.all_within_budget());
    let story = report.get(FormatKey::Story).unwrap();
    assert_eq!(story.summary, "STORY_9_16: 600 KB OVER q=0.2");
    assert_eq!(story.file_name, "BrandCanvasAI_STORY_9_16.jpg");
    assert_eq!(
        report.get(FormatKey::Square).unwrap().summary,
        "SQUARE_1_1: 100 KB OK q=0.92"
    );
    assert_eq!(sink.artifacts().len(), 3);
}

#[test]
fn png_fallback_changes_the_extension() {
    let formats = [Format::get(FormatKey::Square)];
    let opts = ExportOpts::default();
    let mut surface = StageLog {
        size: Some(|_, q| if q.is_none() { 900 * KIB } else { 200 * KIB }),
        ..StageLog::default()
    };
    let mut sink = InMemoryArtifacts::new();
    let report = Exporter::new()
        .export_all_formats(&job(&formats, &opts, Codec::Png), &mut surface, &mut sink)
        .unwrap();
    assert_eq!(report.entries[0].outcome.codec, Codec::Jpeg);
    assert_eq!(sink.names(), ["BrandCanvasAI_SQUARE_1_1.jpg"]);
}

#[test]
fn structural_failure_mid_batch_restores_and_releases() {
    let formats = all_formats();
    let opts = ExportOpts::default();
    let mut surface = StageLog {
        fail_on: Some(FormatKey::Story),
        ..StageLog::default()
    };
    let mut restore_job = job(&formats, &opts, Codec::Png);
    restore_job.restore_to = Format::get(FormatKey::Landscape);
    let mut sink = InMemoryArtifacts::new();
    let exporter = Exporter::new();

    let err = exporter
        .export_all_formats(&restore_job, &mut surface, &mut sink)
        .unwrap_err();
    assert!(err.is_structural());
    assert_eq!(
        surface.presented,
        [FormatKey::Square, FormatKey::Story, FormatKey::Landscape]
    );
    assert_eq!(sink.names(), ["BrandCanvasAI_SQUARE_1_1.png"]);
    assert!(!exporter.is_busy());

    surface.fail_on = None;
    assert!(
        exporter
            .export_all_formats(&restore_job, &mut surface, &mut sink)
            .is_ok()
    );
}

#[test]
fn concurrent_batch_is_rejected_as_busy() {
    /// Starts a second batch from inside the first one.
    struct Reentrant<'e> {
        exporter: &'e Exporter,
        nested: Option<CreativeResult<ExportReport>>,
    }

    impl RenderSurface for Reentrant<'_> {
        fn present(&mut self, format: &Format, _: &[Layer]) -> CreativeResult<SurfaceReady> {
            if self.nested.is_none() {
                let formats = [Format::get(FormatKey::Square)];
                let opts = ExportOpts::default();
                self.nested = Some(self.exporter.export_all_formats(
                    &job(&formats, &opts, Codec::Png),
                    &mut StageLog::default(),
                    &mut InMemoryArtifacts::new(),
                ));
            }
            SurfaceReady::new(format, Rect::new(0.0, 0.0, 10.0, 10.0), 1.0)
        }

        fn encode(&mut self, _: &SurfaceReady, _: &EncodeRequest) -> CreativeResult<Vec<u8>> {
            Ok(vec![1; 32])
        }
    }

    let exporter = Exporter::new();
    let formats = [Format::get(FormatKey::Square)];
    let opts = ExportOpts::default();
    let mut surface = Reentrant {
        exporter: &exporter,
        nested: None,
    };
    let outer = exporter.export_all_formats(
        &job(&formats, &opts, Codec::Png),
        &mut surface,
        &mut InMemoryArtifacts::new(),
    );
    assert!(outer.is_ok());
    assert!(matches!(surface.nested, Some(Err(CreativeError::Busy))));
    assert!(!exporter.is_busy());
}

#[test]
fn held_permit_turns_batches_away_until_dropped() {
    let exporter = Exporter::new();
    let formats = [Format::get(FormatKey::Square)];
    let opts = ExportOpts::default();
    let mut surface = StageLog::default();

    let permit = exporter.try_begin().unwrap();
    assert!(exporter.is_busy());
    assert!(matches!(exporter.try_begin(), Err(CreativeError::Busy)));
    assert!(matches!(
        exporter.export_all_formats(
            &job(&formats, &opts, Codec::Png),
            &mut surface,
            &mut InMemoryArtifacts::new()
        ),
        Err(CreativeError::Busy)
    ));
    assert!(surface.presented.is_empty());

    drop(permit);
    assert!(!exporter.is_busy());
    let report = exporter
        .try_begin()
        .unwrap()
        .run(
            &job(&formats, &opts, Codec::Png),
            &mut surface,
            &mut InMemoryArtifacts::new(),
        )
        .unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(surface.presented, [FormatKey::Square, FormatKey::Story]);
    assert!(!exporter.is_busy());
}

#[test]
fn invalid_opts_fail_before_touching_the_surface() {
    let formats = all_formats();
    let opts = ExportOpts {
        file_prefix: String::new(),
        ..ExportOpts::default()
    };
    let mut surface = StageLog::default();
    let err = Exporter::new()
        .export_all_formats(
            &job(&formats, &opts, Codec::Png),
            &mut surface,
            &mut InMemoryArtifacts::new(),
        )
        .unwrap_err();
    assert!(matches!(err, CreativeError::Validation(_)));
    assert!(surface.presented.is_empty());
}
