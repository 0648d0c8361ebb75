use crate::foundation::core::{BBox, HexColor};
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::geometry::rotate::rotated_bounding_box;

/// Line height multiplier applied to a text layer's font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.25;
/// Number of lines a text box is assumed to span.
pub const TEXT_BOX_LINES: f64 = 2.0;

/// Opaque, unique layer identity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Wrap an existing id (e.g. from a saved creative).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One visual element of a creative.
///
/// `x`/`y` are the top-left corner before rotation; rotation pivots about that corner.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Identity, stable across edits and reorders.
    pub id: LayerId,
    /// Left edge before rotation.
    pub x: f64,
    /// Top edge before rotation.
    pub y: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: LayerKind,
}

/// Layer payload by kind.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerKind {
    /// Raster image (packshot, logo, background).
    Image(ImageBody),
    /// Marketing copy.
    Text(TextBody),
    /// Legal copy; satisfies the alcohol disclaimer requirement.
    Disclaimer(TextBody),
}

/// Payload of an image layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    /// Key of the decoded pixels in the studio image store.
    pub src: String,
    /// Display width in canvas pixels.
    pub width: f64,
    /// Display height in canvas pixels.
    pub height: f64,
}

/// Payload shared by text and disclaimer layers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBody {
    /// Copy.
    pub text: String,
    /// Font size in canvas pixels.
    pub font_size_px: f64,
    /// Fill color.
    pub fill: HexColor,
    /// Wrap width in canvas pixels.
    pub width: f64,
}

impl TextBody {
    /// Height of the text box derived from the font size.
    pub fn box_height(&self) -> f64 {
        (self.font_size_px * TEXT_LINE_HEIGHT * TEXT_BOX_LINES).max(1.0)
    }
}

impl Layer {
    /// New image layer with a fresh id.
    pub fn image(src: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: LayerId::generate(),
            x,
            y,
            rotation: 0.0,
            kind: LayerKind::Image(ImageBody {
                src: src.into(),
                width,
                height,
            }),
        }
    }

    /// New text layer with a fresh id and the default ink.
    pub fn text(text: impl Into<String>, x: f64, y: f64, font_size_px: f64, width: f64) -> Self {
        Self {
            id: LayerId::generate(),
            x,
            y,
            rotation: 0.0,
            kind: LayerKind::Text(TextBody {
                text: text.into(),
                font_size_px,
                fill: HexColor::ink(),
                width,
            }),
        }
    }

    /// New disclaimer layer with a fresh id and the default ink.
    pub fn disclaimer(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        width: f64,
    ) -> Self {
        Self {
            id: LayerId::generate(),
            x,
            y,
            rotation: 0.0,
            kind: LayerKind::Disclaimer(TextBody {
                text: text.into(),
                font_size_px,
                fill: HexColor::ink(),
                width,
            }),
        }
    }

    /// Same layer with an explicit id.
    pub fn with_id(mut self, id: LayerId) -> Self {
        self.id = id;
        self
    }

    /// Same layer rotated to `deg`.
    pub fn with_rotation(mut self, deg: f64) -> Self {
        self.rotation = deg;
        self
    }

    /// Unrotated width and height.
    pub fn size(&self) -> (f64, f64) {
        match &self.kind {
            LayerKind::Image(img) => (img.width, img.height),
            LayerKind::Text(t) | LayerKind::Disclaimer(t) => (t.width, t.box_height()),
        }
    }

    /// Text payload for text and disclaimer layers.
    pub fn text_body(&self) -> Option<&TextBody> {
        match &self.kind {
            LayerKind::Image(_) => None,
            LayerKind::Text(t) | LayerKind::Disclaimer(t) => Some(t),
        }
    }

    pub(crate) fn text_body_mut(&mut self) -> Option<&mut TextBody> {
        match &mut self.kind {
            LayerKind::Image(_) => None,
            LayerKind::Text(t) | LayerKind::Disclaimer(t) => Some(t),
        }
    }

    /// Whether this is a disclaimer layer.
    pub fn is_disclaimer(&self) -> bool {
        matches!(self.kind, LayerKind::Disclaimer(_))
    }

    /// Axis-aligned bounds on the canvas after rotation.
    pub fn bbox(&self) -> BBox {
        let (w, h) = self.size();
        rotated_bounding_box(self.x, self.y, w, h, self.rotation)
    }

    /// Reject attributes the geometry and evaluator layers cannot work with.
    pub fn validate(&self) -> CreativeResult<()> {
        let id = &self.id;
        finite(id, "x", self.x)?;
        finite(id, "y", self.y)?;
        finite(id, "rotation", self.rotation)?;
        match &self.kind {
            LayerKind::Image(img) => {
                non_negative(id, "width", img.width)?;
                non_negative(id, "height", img.height)?;
            }
            LayerKind::Text(t) | LayerKind::Disclaimer(t) => {
                non_negative(id, "width", t.width)?;
                positive(id, "fontSizePx", t.font_size_px)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn finite(id: &LayerId, field: &str, v: f64) -> CreativeResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(CreativeError::validation(format!(
            "layer {id}: {field} must be a finite number"
        )))
    }
}

pub(crate) fn non_negative(id: &LayerId, field: &str, v: f64) -> CreativeResult<()> {
    finite(id, field, v)?;
    if v < 0.0 {
        return Err(CreativeError::validation(format!(
            "layer {id}: {field} must be >= 0"
        )));
    }
    Ok(())
}

pub(crate) fn positive(id: &LayerId, field: &str, v: f64) -> CreativeResult<()> {
    finite(id, field, v)?;
    if v <= 0.0 {
        return Err(CreativeError::validation(format!(
            "layer {id}: {field} must be > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
