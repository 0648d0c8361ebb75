//! BrandCanvas checks advertising creatives against brand rules and exports them to every
//! placement format under a byte budget.
//!
//! The API centers on a [`Studio`]:
//!
//! - Open or build a creative out of [`Layer`]s
//! - Evaluate it with [`Studio::compliance`] (or [`Evaluator`] directly)
//! - Export every [`Format`] through a [`RenderSurface`] into an [`ArtifactSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Placement formats and brand rules.
pub mod catalog;
/// Rule evaluation.
pub mod compliance;
/// Surfaces, byte budgets and export batches.
pub mod export;
/// Rotated bounds and stage fitting.
pub mod geometry;
/// Layers and layer editing.
pub mod layer;
/// Editing sessions, configuration and uploads.
pub mod studio;

pub use crate::foundation::core::{Affine, BBox, Canvas, HexColor, Point, Rect, Vec2};
pub use crate::foundation::error::{CreativeError, CreativeResult};

pub use crate::catalog::format::{Format, FormatKey};
pub use crate::catalog::rules::RuleCatalog;
pub use crate::compliance::evaluator::{Evaluator, LayerModel, ModelKind, TextMeta};
pub use crate::compliance::issue::{ComplianceResult, Issue, IssueCode, Severity, Status};
pub use crate::export::batch::{
    BatchPermit, ExportJob, ExportReport, Exporter, FormatExport, artifact_name, summary_line,
};
pub use crate::export::budget::{ExportOpts, ExportOutcome, QualityLadder, export_within_budget};
pub use crate::export::raster::{RasterSurface, encode_rgba};
pub use crate::export::sink::{ArtifactSink, DirArtifacts, InMemoryArtifacts};
pub use crate::export::surface::{Codec, EncodeRequest, Quality, RenderSurface, SurfaceReady};
pub use crate::geometry::rotate::{rotated_bounding_box, rotated_center};
pub use crate::geometry::stage::{StageFit, Viewport};
pub use crate::layer::model::{ImageBody, Layer, LayerId, LayerKind, TextBody};
pub use crate::layer::patch::LayerPatch;
pub use crate::layer::stack::LayerStack;
pub use crate::studio::assets::{ImageStore, decode_image};
pub use crate::studio::config::{Creative, StudioConfig};
pub use crate::studio::session::Studio;
pub use crate::studio::upload::{BackgroundRemover, KeepBackground, RemovalFailure};
