use crate::foundation::core::{BBox, Canvas};
use crate::foundation::error::{CreativeError, CreativeResult};

/// The fixed set of placements a creative is exported to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum FormatKey {
    /// 1:1 feed square.
    #[serde(rename = "SQUARE_1_1")]
    Square,
    /// 9:16 vertical story.
    #[serde(rename = "STORY_9_16")]
    Story,
    /// 1.91:1 landscape link card.
    #[serde(rename = "LANDSCAPE_1_91_1")]
    Landscape,
}

impl FormatKey {
    /// Every format, in export order.
    pub const ALL: [FormatKey; 3] = [FormatKey::Square, FormatKey::Story, FormatKey::Landscape];

    /// Stable key string used in file names and summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKey::Square => "SQUARE_1_1",
            FormatKey::Story => "STORY_9_16",
            FormatKey::Landscape => "LANDSCAPE_1_91_1",
        }
    }

    /// Inverse of [`FormatKey::as_str`].
    pub fn parse(s: &str) -> CreativeResult<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CreativeError::validation(format!("unknown format key '{s}'")))
    }
}

impl std::fmt::Display for FormatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas dimensions and safe margin of one placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    /// Placement key.
    pub key: FormatKey,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Inset applied on all four sides to obtain the safe zone.
    pub safe_margin: u32,
}

impl Format {
    /// Catalog lookup.
    pub fn get(key: FormatKey) -> Self {
        match key {
            FormatKey::Square => Self {
                key,
                width: 1080,
                height: 1080,
                safe_margin: 60,
            },
            FormatKey::Story => Self {
                key,
                width: 1080,
                height: 1920,
                safe_margin: 80,
            },
            FormatKey::Landscape => Self {
                key,
                width: 1200,
                height: 628,
                safe_margin: 50,
            },
        }
    }

    /// All catalog formats in export order.
    pub fn all() -> Vec<Self> {
        FormatKey::ALL.into_iter().map(Self::get).collect()
    }

    /// Build a custom-sized format; the margin must leave a non-empty safe zone.
    pub fn new(key: FormatKey, width: u32, height: u32, safe_margin: u32) -> CreativeResult<Self> {
        let f = Self {
            key,
            width,
            height,
            safe_margin,
        };
        f.validate()?;
        Ok(f)
    }

    /// Check `0 < 2 * safe_margin < min(width, height)`.
    pub fn validate(&self) -> CreativeResult<()> {
        let double = u64::from(self.safe_margin) * 2;
        if self.safe_margin == 0 {
            return Err(CreativeError::validation(format!(
                "format {} safe margin must be > 0",
                self.key
            )));
        }
        if double >= u64::from(self.width.min(self.height)) {
            return Err(CreativeError::validation(format!(
                "format {} safe margin {} leaves no safe zone in {}x{}",
                self.key, self.safe_margin, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// The canvas inset by the safe margin on every side.
    pub fn safe_rect(&self) -> BBox {
        let m = f64::from(self.safe_margin);
        BBox::new(
            m,
            m,
            f64::from(self.width) - 2.0 * m,
            f64::from(self.height) - 2.0 * m,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/format.rs"]
mod tests;
