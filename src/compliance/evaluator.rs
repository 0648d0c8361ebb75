use crate::catalog::format::Format;
use crate::catalog::rules::RuleCatalog;
use crate::compliance::issue::{ComplianceResult, Issue, IssueCode, Status};
use crate::foundation::core::{BBox, HexColor};
use crate::layer::model::{Layer, LayerId, LayerKind};

/// Kind of a layer as the rules see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Exempt from typography rules.
    Image,
    /// Subject to the minimum font size.
    Text,
    /// Subject to the minimum font size; satisfies the disclaimer requirement.
    Disclaimer,
}

/// Typography attached to text and disclaimer layers.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMeta {
    /// Font size; a missing size is treated as 0.
    pub font_px: Option<f64>,
    /// Fill color.
    pub fill: Option<HexColor>,
}

/// A layer reduced to what the rules read: identity, kind, rotated bounds and typography.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerModel {
    /// Layer identity, echoed on issues.
    pub id: LayerId,
    /// Rule-relevant kind.
    pub kind: ModelKind,
    /// Axis-aligned bounds after rotation.
    pub bbox: BBox,
    /// Typography for text kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_meta: Option<TextMeta>,
}

impl LayerModel {
    /// Project a layer, computing its rotated bounds.
    pub fn from_layer(layer: &Layer) -> Self {
        let (kind, text_meta) = match &layer.kind {
            LayerKind::Image(_) => (ModelKind::Image, None),
            LayerKind::Text(t) | LayerKind::Disclaimer(t) => {
                let kind = if layer.is_disclaimer() {
                    ModelKind::Disclaimer
                } else {
                    ModelKind::Text
                };
                (
                    kind,
                    Some(TextMeta {
                        font_px: Some(t.font_size_px),
                        fill: Some(t.fill.clone()),
                    }),
                )
            }
        };
        Self {
            id: layer.id.clone(),
            kind,
            bbox: layer.bbox(),
            text_meta,
        }
    }
}

/// Stateless rule evaluator.
pub struct Evaluator;

impl Evaluator {
    /// Evaluate layer models against `format` and `rules`.
    ///
    /// Issues follow layer order (containment before font size per layer); the disclaimer
    /// requirement is checked last. The result is recomputed from scratch on every call.
    #[tracing::instrument(skip(layers, rules), fields(format = %format.key, layers = layers.len()))]
    pub fn evaluate(
        format: &Format,
        layers: &[LayerModel],
        is_alcohol: bool,
        rules: &RuleCatalog,
    ) -> ComplianceResult {
        let safe_rect = format.safe_rect();
        let mut issues = Vec::new();

        for layer in layers {
            if !safe_rect.contains_box(layer.bbox) {
                issues.push(Issue::new(
                    IssueCode::OutsideSafeZone,
                    "Layer is outside safe zone.",
                    Some(layer.id.clone()),
                ));
            }

            if matches!(layer.kind, ModelKind::Text | ModelKind::Disclaimer) {
                let font_px = layer
                    .text_meta
                    .as_ref()
                    .and_then(|m| m.font_px)
                    .unwrap_or(0.0);
                if font_px < rules.min_font_px {
                    issues.push(Issue::new(
                        IssueCode::MinFont,
                        format!("Font size must be >= {}px.", rules.min_font_px),
                        Some(layer.id.clone()),
                    ));
                }
            }
        }

        if is_alcohol && !layers.iter().any(|l| l.kind == ModelKind::Disclaimer) {
            issues.push(Issue::new(
                IssueCode::MissingDisclaimer,
                "Alcohol creative requires a disclaimer.",
                None,
            ));
        }

        let status = Status::aggregate(&issues);
        tracing::debug!(%status, issues = issues.len(), "creative evaluated");
        ComplianceResult {
            status,
            safe_rect,
            issues,
        }
    }

    /// Project `layers` and evaluate them.
    pub fn evaluate_layers<'a>(
        format: &Format,
        layers: impl IntoIterator<Item = &'a Layer>,
        is_alcohol: bool,
        rules: &RuleCatalog,
    ) -> ComplianceResult {
        let models: Vec<LayerModel> = layers.into_iter().map(LayerModel::from_layer).collect();
        Self::evaluate(format, &models, is_alcohol, rules)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compliance/evaluator.rs"]
mod tests;
