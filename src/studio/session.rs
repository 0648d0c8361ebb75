use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use image::RgbaImage;

use crate::catalog::format::{Format, FormatKey};
use crate::compliance::evaluator::Evaluator;
use crate::compliance::issue::{ComplianceResult, Issue, IssueCode};
use crate::export::batch::{ExportJob, ExportReport, Exporter};
use crate::export::sink::ArtifactSink;
use crate::export::surface::{Codec, RenderSurface};
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::foundation::math::round_half_up;
use crate::layer::model::{Layer, LayerId};
use crate::layer::patch::LayerPatch;
use crate::layer::stack::LayerStack;
use crate::studio::assets::{ImageStore, decode_image};
use crate::studio::config::{Creative, StudioConfig};
use crate::studio::upload::BackgroundRemover;

/// Fill of the demo headline: light grey on white, a typical contrast complaint.
const DEMO_FILL: &str = "#9ca3af";

#[derive(Debug, Default)]
struct CanvasState {
    layers: LayerStack,
    is_alcohol: bool,
}

/// One open creative: layers, alcohol flag, active format and uploaded images.
///
/// `Studio` is `Send + Sync`. Edits take a write lock on the layer state; compliance and export
/// read it. An export batch holds its read lock and the active format for the whole batch, so
/// edits and format switches issued meanwhile wait for it to finish. Only one export batch runs
/// at a time; others fail with [`CreativeError::Busy`] without waiting on any lock.
#[derive(Debug)]
pub struct Studio {
    config: StudioConfig,
    active: Mutex<FormatKey>,
    state: RwLock<CanvasState>,
    images: RwLock<ImageStore>,
    exporter: Exporter,
    export_log: Mutex<Vec<String>>,
}

impl Default for Studio {
    fn default() -> Self {
        Self::with_parts(StudioConfig::default(), FormatKey::Square, CanvasState::default())
    }
}

impl Studio {
    fn with_parts(config: StudioConfig, format: FormatKey, state: CanvasState) -> Self {
        Self {
            config,
            active: Mutex::new(format),
            state: RwLock::new(state),
            images: RwLock::new(ImageStore::new()),
            exporter: Exporter::new(),
            export_log: Mutex::new(Vec::new()),
        }
    }

    /// Empty square creative with a validated `config`.
    pub fn new(config: StudioConfig) -> CreativeResult<Self> {
        config.validate()?;
        Ok(Self::with_parts(
            config,
            FormatKey::Square,
            CanvasState::default(),
        ))
    }

    /// Open a saved creative. Layers are validated and must have unique ids.
    pub fn from_creative(config: StudioConfig, creative: Creative) -> CreativeResult<Self> {
        config.validate()?;
        let layers = LayerStack::from_layers(creative.layers)?;
        Ok(Self::with_parts(
            config,
            creative.format,
            CanvasState {
                layers,
                is_alcohol: creative.is_alcohol,
            },
        ))
    }

    /// Current creative as a saveable document.
    pub fn snapshot(&self) -> Creative {
        let format = self.active_key();
        let state = self.read_state();
        Creative {
            format,
            is_alcohol: state.is_alcohol,
            layers: state.layers.as_slice().to_vec(),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CanvasState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CanvasState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn active_key(&self) -> FormatKey {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self) -> MutexGuard<'_, Vec<String>> {
        self.export_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Active format.
    pub fn format(&self) -> Format {
        Format::get(self.active_key())
    }

    /// Switch the active format. Layers keep their coordinates; waits for a running export.
    pub fn set_format(&self, key: FormatKey) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = key;
    }

    /// Whether alcohol rules apply.
    pub fn is_alcohol(&self) -> bool {
        self.read_state().is_alcohol
    }

    /// Toggle alcohol rules.
    pub fn set_alcohol(&self, is_alcohol: bool) {
        self.write_state().is_alcohol = is_alcohol;
    }

    /// Copy of the layers in painter's order.
    pub fn layers(&self) -> Vec<Layer> {
        self.read_state().layers.as_slice().to_vec()
    }

    /// Copy of one layer.
    pub fn layer(&self, id: &LayerId) -> Option<Layer> {
        self.read_state().layers.get(id).cloned()
    }

    /// Append a layer on top.
    pub fn add_layer(&self, layer: Layer) -> CreativeResult<LayerId> {
        self.write_state().layers.push(layer)
    }

    /// Add the default headline for the active format.
    pub fn add_headline(&self) -> CreativeResult<LayerId> {
        let format = self.format();
        self.write_state().layers.add_headline(&format)
    }

    /// Add the default subline for the active format.
    pub fn add_subtext(&self) -> CreativeResult<LayerId> {
        let format = self.format();
        self.write_state()
            .layers
            .add_subtext(&format, &self.config.rules)
    }

    /// Add the catalog disclaimer for the active format.
    pub fn add_disclaimer(&self) -> CreativeResult<LayerId> {
        let format = self.format();
        self.write_state()
            .layers
            .add_disclaimer(&format, &self.config.rules)
    }

    /// Apply a validated partial edit.
    pub fn update_layer(&self, id: &LayerId, patch: &LayerPatch) -> CreativeResult<()> {
        self.write_state().layers.update(id, patch)
    }

    /// Remove a layer; `false` if it did not exist.
    pub fn remove_layer(&self, id: &LayerId) -> bool {
        self.write_state().layers.remove(id).is_some()
    }

    /// Draw a layer last.
    pub fn bring_to_front(&self, id: &LayerId) {
        self.write_state().layers.bring_to_front(id);
    }

    /// Draw a layer first.
    pub fn send_to_back(&self, id: &LayerId) {
        self.write_state().layers.send_to_back(id);
    }

    /// Pull a layer inside the active format's safe zone.
    pub fn fit_to_safe_zone(&self, id: &LayerId) -> CreativeResult<()> {
        let safe = self.format().safe_rect();
        self.write_state().layers.fit_to_safe_zone(id, safe)
    }

    /// Raise a text layer to the catalog's minimum font size.
    pub fn fix_min_font(&self, id: &LayerId) -> CreativeResult<()> {
        self.write_state()
            .layers
            .fix_min_font(id, self.config.rules.min_font_px)
    }

    /// Reset a text layer's fill to the default ink.
    pub fn fix_contrast(&self, id: &LayerId) -> CreativeResult<()> {
        self.write_state().layers.fix_contrast(id)
    }

    /// Clear layers, the alcohol flag, uploaded images and the export log.
    pub fn reset(&self) {
        {
            let mut state = self.write_state();
            state.layers.clear();
            state.is_alcohol = false;
        }
        self.images
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.log().clear();
    }

    /// Load the failing demo: an alcohol square with one small, low-contrast headline at the
    /// canvas corner. Returns the headline's id.
    pub fn load_demo(&self) -> CreativeResult<LayerId> {
        let format = Format::get(FormatKey::Square);
        let font = (self.config.rules.min_font_px - 6.0).max(10.0);
        let mut headline = Layer::text(
            "Mega Offer",
            0.0,
            0.0,
            font,
            round_half_up(f64::from(format.width) * 0.85),
        );
        LayerPatch {
            fill: Some(DEMO_FILL.to_string()),
            ..LayerPatch::default()
        }
        .apply(&mut headline)?;

        let id = headline.id.clone();
        let layers = LayerStack::from_layers(vec![headline])?;
        {
            let mut state = self.write_state();
            state.layers = layers;
            state.is_alcohol = true;
        }
        self.set_format(FormatKey::Square);
        Ok(id)
    }

    /// Evaluate the creative as it is now.
    pub fn compliance(&self) -> ComplianceResult {
        let format = self.format();
        let state = self.read_state();
        Evaluator::evaluate_layers(&format, &state.layers, state.is_alcohol, &self.config.rules)
    }

    /// Act on a clicked issue: returns the layer to focus.
    ///
    /// A missing disclaimer is resolved by adding one, whose id is returned.
    pub fn resolve_issue(&self, issue: &Issue) -> CreativeResult<Option<LayerId>> {
        if issue.code == IssueCode::MissingDisclaimer {
            return self.add_disclaimer().map(Some);
        }
        Ok(issue
            .layer_id
            .as_ref()
            .filter(|id| self.read_state().layers.get(id).is_some())
            .cloned())
    }

    /// Run `remover` on an upload and add the result as a centered packshot.
    ///
    /// On failure nothing changes. The image side is 55% of the canvas width, placed
    /// horizontally centered at 22% of the canvas height.
    #[tracing::instrument(skip(self, upload, remover), fields(bytes = upload.len()))]
    pub fn upload_image(
        &self,
        upload: &[u8],
        remover: &dyn BackgroundRemover,
    ) -> CreativeResult<LayerId> {
        let cutout = remover.remove_background(upload).map_err(|f| {
            tracing::warn!(status = f.status, message = %f.message, "background removal failed");
            CreativeError::from(f)
        })?;
        let pixels = decode_image(&cutout)?;

        let format = self.format();
        let fw = f64::from(format.width);
        let side = round_half_up(fw * 0.55);
        let x = round_half_up((fw - side) / 2.0);
        let y = round_half_up(f64::from(format.height) * 0.22);

        let key = self
            .images
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pixels);
        let pushed = self
            .write_state()
            .layers
            .push(Layer::image(key.clone(), x, y, side, side));
        if pushed.is_err() {
            self.images
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
        }
        pushed
    }

    /// Decoded pixels behind an image layer's `src`.
    pub fn image(&self, src: &str) -> Option<Arc<RgbaImage>> {
        self.images
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(src)
    }

    /// Export every catalog format.
    pub fn export_all(
        &self,
        codec: Codec,
        surface: &mut dyn RenderSurface,
        sink: &mut dyn ArtifactSink,
    ) -> CreativeResult<ExportReport> {
        self.export_formats(&FormatKey::ALL, codec, surface, sink)
    }

    /// Export `formats` in order, then show the active format again.
    ///
    /// A concurrent export fails with `Busy` at once. Layer edits and format switches block
    /// until the batch returns.
    pub fn export_formats(
        &self,
        formats: &[FormatKey],
        codec: Codec,
        surface: &mut dyn RenderSurface,
        sink: &mut dyn ArtifactSink,
    ) -> CreativeResult<ExportReport> {
        let permit = self.exporter.try_begin()?;
        let state = self.read_state();
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        let formats: Vec<Format> = formats.iter().copied().map(Format::get).collect();
        let job = ExportJob {
            formats: &formats,
            layers: state.layers.as_slice(),
            restore_to: Format::get(*active),
            codec,
            opts: &self.config.export,
        };
        let report = permit.run(&job, surface, sink)?;
        *self.log() = report
            .summary_lines()
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(report)
    }

    /// Summary lines of the last successful export batch.
    pub fn export_log(&self) -> Vec<String> {
        self.log().clone()
    }

    /// Whether an export batch is running.
    pub fn is_exporting(&self) -> bool {
        self.exporter.is_busy()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/session.rs"]
mod tests;
