use crate::catalog::format::{Format, FormatKey};
use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::layer::model::Layer;

/// Output codec of an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG.
    Jpeg,
}

impl Codec {
    /// File extension for artifacts in this codec.
    pub fn extension(self) -> &'static str {
        match self {
            Codec::Png => "png",
            Codec::Jpeg => "jpg",
        }
    }

    /// Whether the codec ignores the quality knob.
    pub fn is_lossless(self) -> bool {
        matches!(self, Codec::Png)
    }

    /// Parse `png`, `jpeg` or `jpg`, case-insensitively.
    pub fn parse(s: &str) -> CreativeResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Codec::Png),
            "jpeg" | "jpg" => Ok(Codec::Jpeg),
            other => Err(CreativeError::validation(format!("unknown codec '{other}'"))),
        }
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Codec::Png => "png",
            Codec::Jpeg => "jpeg",
        })
    }
}

/// Lossy encoder quality in hundredths, `0..=100`.
///
/// Integer hundredths keep the ladder arithmetic exact; `Display` prints the decimal form
/// (`92` shows as `0.92`, `80` as `0.8`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Full quality.
    pub const MAX: Quality = Quality(100);

    /// Build from hundredths, saturating at 100.
    pub const fn saturating(v: u8) -> Self {
        Self(if v > 100 { 100 } else { v })
    }

    /// Build from hundredths, rejecting values above 100.
    pub fn from_hundredths(v: u8) -> CreativeResult<Self> {
        if v > 100 {
            return Err(CreativeError::validation(format!(
                "quality must be at most 100 hundredths, got {v}"
            )));
        }
        Ok(Self(v))
    }

    /// Build from a decimal in `[0, 1]`, rounding to two places.
    pub fn from_unit(q: f64) -> CreativeResult<Self> {
        if !q.is_finite() || !(0.0..=1.0).contains(&q) {
            return Err(CreativeError::validation(format!(
                "quality must be within [0, 1], got {q}"
            )));
        }
        Ok(Self((q * 100.0).round() as u8))
    }

    /// Raw hundredths.
    pub const fn hundredths(self) -> u8 {
        self.0
    }

    /// Decimal form in `[0, 1]`.
    pub fn as_unit(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub(crate) fn checked_sub(self, step: Quality) -> Option<Quality> {
        self.0.checked_sub(step.0).map(Quality)
    }
}

impl TryFrom<u8> for Quality {
    type Error = CreativeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::from_hundredths(v)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_unit())
    }
}

/// Everything an encoder needs besides the pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncodeRequest {
    /// Stage region to capture.
    pub crop: Rect,
    /// Density multiplier applied to the crop.
    pub pixel_ratio: f64,
    /// Output codec.
    pub codec: Codec,
    /// Lossy quality; `None` for lossless output.
    pub quality: Option<Quality>,
}

/// Proof that a surface finished switching to a format.
///
/// Surfaces mint these in [`RenderSurface::present`] once layout has settled; `encode` takes one
/// so a capture can never race a pending format switch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceReady {
    format: FormatKey,
    canvas: Canvas,
    crop: Rect,
    pixel_ratio: f64,
}

impl SurfaceReady {
    /// Record that `format` is on screen, occupying `crop` at `pixel_ratio`.
    pub fn new(format: &Format, crop: Rect, pixel_ratio: f64) -> CreativeResult<Self> {
        if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
            return Err(CreativeError::surface_unavailable(format!(
                "{}: pixel ratio {pixel_ratio} is not usable",
                format.key
            )));
        }
        if crop.width() <= 0.0 || crop.height() <= 0.0 {
            return Err(CreativeError::surface_unavailable(format!(
                "{}: empty crop region",
                format.key
            )));
        }
        Ok(Self {
            format: format.key,
            canvas: format.canvas(),
            crop,
            pixel_ratio,
        })
    }

    /// Format on screen.
    pub fn format(&self) -> FormatKey {
        self.format
    }

    /// Full-resolution canvas of that format.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Stage region covering the canvas.
    pub fn crop(&self) -> Rect {
        self.crop
    }

    /// Density multiplier restoring full canvas resolution.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Encode request for this surface state.
    pub fn request(&self, codec: Codec, quality: Option<Quality>) -> EncodeRequest {
        EncodeRequest {
            crop: self.crop,
            pixel_ratio: self.pixel_ratio,
            codec,
            quality: if codec.is_lossless() { None } else { quality },
        }
    }
}

/// The live rendering context exports are captured from.
///
/// `present` switches the surface to a format and returns only once it reflects that format;
/// `encode` captures and encodes the presented pixels. Both block the caller.
pub trait RenderSurface {
    /// Show `layers` on the canvas of `format` and wait until the surface is settled.
    fn present(&mut self, format: &Format, layers: &[Layer]) -> CreativeResult<SurfaceReady>;

    /// Capture and encode the surface described by `ready`.
    fn encode(&mut self, ready: &SurfaceReady, request: &EncodeRequest) -> CreativeResult<Vec<u8>>;
}

#[cfg(test)]
#[path = "../../tests/unit/export/surface.rs"]
mod tests;
