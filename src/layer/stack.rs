use crate::catalog::format::Format;
use crate::catalog::rules::RuleCatalog;
use crate::foundation::core::{BBox, HexColor};
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::foundation::math::round_half_up;
use crate::layer::model::{Layer, LayerId, LayerKind};
use crate::layer::patch::LayerPatch;

/// Vertical room reserved for a text block when clamping it into the safe zone.
const TEXT_FIT_HEIGHT: f64 = 60.0;

/// The creative's layers in painter's order (index 0 is drawn first).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing layers, rejecting duplicate ids and malformed attributes.
    pub fn from_layers(layers: Vec<Layer>) -> CreativeResult<Self> {
        let mut stack = Self::new();
        for layer in layers {
            stack.push(layer)?;
        }
        Ok(stack)
    }

    /// Layers in painter's order.
    pub fn as_slice(&self) -> &[Layer] {
        &self.layers
    }

    /// Iterate in painter's order.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Look up a layer.
    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    fn get_mut(&mut self, id: &LayerId) -> CreativeResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| CreativeError::validation(format!("unknown layer {id}")))
    }

    /// Append on top of the stack.
    pub fn push(&mut self, layer: Layer) -> CreativeResult<LayerId> {
        layer.validate()?;
        if self.get(&layer.id).is_some() {
            return Err(CreativeError::validation(format!(
                "duplicate layer id {}",
                layer.id
            )));
        }
        let id = layer.id.clone();
        self.layers.push(layer);
        Ok(id)
    }

    /// Apply a validated partial edit.
    pub fn update(&mut self, id: &LayerId, patch: &LayerPatch) -> CreativeResult<()> {
        patch.apply(self.get_mut(id)?)
    }

    /// Remove a layer, returning it if it existed.
    pub fn remove(&mut self, id: &LayerId) -> Option<Layer> {
        let idx = self.index_of(id)?;
        Some(self.layers.remove(idx))
    }

    /// Move a layer to the top of the painter's order. Unknown ids are ignored.
    pub fn bring_to_front(&mut self, id: &LayerId) {
        if let Some(idx) = self.index_of(id) {
            let layer = self.layers.remove(idx);
            self.layers.push(layer);
        }
    }

    /// Move a layer to the bottom of the painter's order. Unknown ids are ignored.
    pub fn send_to_back(&mut self, id: &LayerId) {
        if let Some(idx) = self.index_of(id) {
            let layer = self.layers.remove(idx);
            self.layers.insert(0, layer);
        }
    }

    /// Drop every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Add the default headline at the safe-zone corner.
    pub fn add_headline(&mut self, format: &Format) -> CreativeResult<LayerId> {
        let m = f64::from(format.safe_margin);
        self.push(Layer::text(
            "New Year Offers",
            m,
            m,
            44.0,
            round_half_up(f64::from(format.width) * 0.75),
        ))
    }

    /// Add the default subline under the headline.
    pub fn add_subtext(&mut self, format: &Format, rules: &RuleCatalog) -> CreativeResult<LayerId> {
        let m = f64::from(format.safe_margin);
        self.push(Layer::text(
            "Limited time only",
            m,
            m + 64.0,
            rules.min_font_px.max(26.0),
            round_half_up(f64::from(format.width) * 0.7),
        ))
    }

    /// Add the catalog disclaimer near the bottom of the safe zone.
    pub fn add_disclaimer(
        &mut self,
        format: &Format,
        rules: &RuleCatalog,
    ) -> CreativeResult<LayerId> {
        let m = f64::from(format.safe_margin);
        self.push(Layer::disclaimer(
            rules.disclaimer_text.clone(),
            m,
            f64::from(format.height) - m - 40.0,
            rules.min_font_px.max(26.0),
            round_half_up(f64::from(format.width) * 0.7),
        ))
    }

    /// Pull a layer back inside `safe`, shrinking images that cannot fit.
    ///
    /// Rotation is not taken into account; a rotated layer may still overhang afterwards.
    pub fn fit_to_safe_zone(&mut self, id: &LayerId, safe: BBox) -> CreativeResult<()> {
        let layer = self.get_mut(id)?;
        let (x, y) = (layer.x, layer.y);
        match &mut layer.kind {
            LayerKind::Image(img) => {
                let scale_down = 1f64
                    .min(safe.w / img.width)
                    .min(safe.h / img.height);
                let nw = (img.width * scale_down).floor();
                let nh = (img.height * scale_down).floor();
                img.width = nw;
                img.height = nh;
                layer.x = x.max(safe.x).min(safe.right() - nw);
                layer.y = y.max(safe.y).min(safe.bottom() - nh);
            }
            LayerKind::Text(t) | LayerKind::Disclaimer(t) => {
                let w = t.width;
                layer.x = x.max(safe.x).min(safe.right() - w);
                layer.y = y.max(safe.y).min(safe.bottom() - TEXT_FIT_HEIGHT);
            }
        }
        Ok(())
    }

    /// Raise a text layer's font size to at least `min_font_px`. Images are left alone.
    pub fn fix_min_font(&mut self, id: &LayerId, min_font_px: f64) -> CreativeResult<()> {
        if let Some(t) = self.get_mut(id)?.text_body_mut() {
            t.font_size_px = t.font_size_px.max(min_font_px);
        }
        Ok(())
    }

    /// Reset a text layer's fill to the default dark ink. Images are left alone.
    pub fn fix_contrast(&mut self, id: &LayerId) -> CreativeResult<()> {
        if let Some(t) = self.get_mut(id)?.text_body_mut() {
            t.fill = HexColor::ink();
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/stack.rs"]
mod tests;
