use crate::foundation::error::{CreativeError, CreativeResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Axis-aligned box in canvas pixels, `w` and `h` never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl BBox {
    /// Build a box, folding negative extents to zero.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    /// Convert a (possibly unordered) `kurbo::Rect` into a box.
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs();
        Self {
            x: r.x0,
            y: r.y0,
            w: r.width(),
            h: r.height(),
        }
    }

    /// The same box as a `kurbo::Rect`.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    /// Right edge.
    pub fn right(self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(self) -> f64 {
        self.y + self.h
    }

    /// Closed containment: every edge of `inner` lies on or inside `self`.
    pub fn contains_box(self, inner: BBox) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    /// Closed point containment (edges included).
    pub fn contains_point(self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.right() && p.y <= self.bottom()
    }
}

/// `#rrggbb` fill color, stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Default dark ink used for new text layers and contrast fixes.
    pub const INK: &'static str = "#0f172a";

    /// Parse `#rgb` or `#rrggbb`.
    pub fn parse(raw: &str) -> CreativeResult<Self> {
        let s = raw.trim();
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| CreativeError::validation(format!("color '{raw}' must start with '#'")))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CreativeError::validation(format!(
                "color '{raw}' contains non-hex digits"
            )));
        }
        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => {
                return Err(CreativeError::validation(format!(
                    "color '{raw}' must have 3 or 6 hex digits"
                )));
            }
        };
        Ok(Self(format!("#{}", expanded.to_ascii_lowercase())))
    }

    /// The dark default ink.
    pub fn ink() -> Self {
        Self(Self::INK.to_string())
    }

    /// Borrow the normalized `#rrggbb` form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode into RGB channels.
    pub fn to_rgb(&self) -> [u8; 3] {
        let h = &self.0[1..];
        let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4)]
    }
}

impl TryFrom<String> for HexColor {
    type Error = CreativeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
