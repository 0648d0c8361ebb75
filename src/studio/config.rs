use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::catalog::format::FormatKey;
use crate::catalog::rules::RuleCatalog;
use crate::export::budget::ExportOpts;
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::geometry::stage::Viewport;
use crate::layer::model::Layer;

/// Engine configuration: brand rules, export settings and stage size.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudioConfig {
    /// Compliance rules.
    pub rules: RuleCatalog,
    /// Budget, naming and quality ladder.
    pub export: ExportOpts,
    /// Stage the host lays canvases out in.
    pub viewport: Viewport,
}

impl StudioConfig {
    /// Parse from a JSON reader; missing sections take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> CreativeResult<Self> {
        let mut cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CreativeError::serde(format!("parse studio config JSON: {e}")))?;
        cfg.viewport = Viewport::new(cfg.viewport.width, cfg.viewport.height);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CreativeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CreativeError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate rules and export settings.
    pub fn validate(&self) -> CreativeResult<()> {
        self.rules.validate()?;
        self.export.validate()?;
        if !(self.viewport.width.is_finite() && self.viewport.height.is_finite()) {
            return Err(CreativeError::validation("viewport must be finite"));
        }
        Ok(())
    }
}

/// A saved creative: active format, alcohol flag and layers in painter's order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creative {
    /// Format shown when the creative is opened.
    pub format: FormatKey,
    /// Whether alcohol rules apply.
    #[serde(default)]
    pub is_alcohol: bool,
    /// Layers, bottom first.
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Creative {
    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CreativeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CreativeError::serde(format!("parse creative JSON: {e}")))
    }

    /// Parse a JSON creative file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CreativeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CreativeError::validation(format!("open creative JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON.
    pub fn to_json_pretty(&self) -> CreativeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CreativeError::serde(format!("serialize creative JSON: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/config.rs"]
mod tests;
