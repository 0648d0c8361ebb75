use crate::foundation::core::HexColor;
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::layer::model::{Layer, LayerKind, finite, non_negative, positive};

/// Partial edit of a layer, as produced by a properties panel.
///
/// Every field is optional; present fields are validated before anything is written, so a
/// rejected patch leaves the layer untouched.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerPatch {
    /// New left edge.
    pub x: Option<f64>,
    /// New top edge.
    pub y: Option<f64>,
    /// New rotation in degrees.
    pub rotation: Option<f64>,
    /// New width (images and text).
    pub width: Option<f64>,
    /// New height (images only; text height follows the font size).
    pub height: Option<f64>,
    /// New font size (text and disclaimer only).
    pub font_size_px: Option<f64>,
    /// New fill color as `#rgb` / `#rrggbb` (text and disclaimer only).
    pub fill: Option<String>,
    /// New copy (text and disclaimer only).
    pub text: Option<String>,
}

impl LayerPatch {
    /// Move to `(x, y)`.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Parse a raw form-field value into a number, rejecting anything non-numeric.
    pub fn parse_number(field: &str, raw: &str) -> CreativeResult<f64> {
        let v: f64 = raw.trim().parse().map_err(|_| {
            CreativeError::validation(format!("{field}: '{raw}' is not a number"))
        })?;
        if !v.is_finite() {
            return Err(CreativeError::validation(format!(
                "{field}: '{raw}' is not a finite number"
            )));
        }
        Ok(v)
    }

    /// Apply to `layer`, or leave it untouched and report why the patch is invalid.
    pub fn apply(&self, layer: &mut Layer) -> CreativeResult<()> {
        let mut next = layer.clone();
        let id = next.id.clone();

        if let Some(x) = self.x {
            finite(&id, "x", x)?;
            next.x = x;
        }
        if let Some(y) = self.y {
            finite(&id, "y", y)?;
            next.y = y;
        }
        if let Some(r) = self.rotation {
            finite(&id, "rotation", r)?;
            next.rotation = r;
        }

        match &mut next.kind {
            LayerKind::Image(img) => {
                if self.font_size_px.is_some() || self.fill.is_some() || self.text.is_some() {
                    return Err(CreativeError::validation(format!(
                        "layer {id}: image layers have no text attributes"
                    )));
                }
                if let Some(w) = self.width {
                    non_negative(&id, "width", w)?;
                    img.width = w;
                }
                if let Some(h) = self.height {
                    non_negative(&id, "height", h)?;
                    img.height = h;
                }
            }
            LayerKind::Text(t) | LayerKind::Disclaimer(t) => {
                if self.height.is_some() {
                    return Err(CreativeError::validation(format!(
                        "layer {id}: text height follows the font size"
                    )));
                }
                if let Some(w) = self.width {
                    non_negative(&id, "width", w)?;
                    t.width = w;
                }
                if let Some(fs) = self.font_size_px {
                    positive(&id, "fontSizePx", fs)?;
                    t.font_size_px = fs;
                }
                if let Some(fill) = &self.fill {
                    t.fill = HexColor::parse(fill)?;
                }
                if let Some(text) = &self.text {
                    t.text = text.clone();
                }
            }
        }

        *layer = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/patch.rs"]
mod tests;
