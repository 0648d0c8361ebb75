use crate::foundation::error::{CreativeError, CreativeResult};

/// Brand rules shared by every format.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleCatalog {
    /// Smallest allowed font size for text and disclaimer layers.
    pub min_font_px: f64,
    /// Copy inserted when a disclaimer layer is added.
    pub disclaimer_text: String,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            min_font_px: 24.0,
            disclaimer_text: "Please drink responsibly.".to_string(),
        }
    }
}

impl RuleCatalog {
    /// Reject a non-positive minimum font size or empty disclaimer copy.
    pub fn validate(&self) -> CreativeResult<()> {
        if !(self.min_font_px.is_finite() && self.min_font_px > 0.0) {
            return Err(CreativeError::validation(format!(
                "minFontPx must be a positive number, got {}",
                self.min_font_px
            )));
        }
        if self.disclaimer_text.trim().is_empty() {
            return Err(CreativeError::validation("disclaimerText must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/rules.rs"]
mod tests;
