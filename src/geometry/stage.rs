use crate::foundation::core::{Canvas, Rect, Vec2};

/// Smallest stage the host will ever lay a canvas out in.
pub const MIN_VIEWPORT: Viewport = Viewport {
    width: 320.0,
    height: 420.0,
};

/// Host stage size in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Stage width.
    pub width: f64,
    /// Stage height.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 650.0,
        }
    }
}

impl Viewport {
    /// Build a viewport, clamping to [`MIN_VIEWPORT`].
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(MIN_VIEWPORT.width),
            height: height.max(MIN_VIEWPORT.height),
        }
    }
}

/// How a canvas sits inside the stage: a uniform down-scale plus a centering offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageFit {
    /// Stage pixels per canvas pixel, never above 1.
    pub scale: f64,
    /// Top-left of the scaled canvas in stage pixels.
    pub offset: Vec2,
    /// Stage region covering the canvas.
    pub crop: Rect,
    /// Density multiplier that maps the crop back to full canvas resolution.
    pub pixel_ratio: f64,
}

impl StageFit {
    /// Fit `canvas` into `viewport` without ever scaling up.
    pub fn fit(viewport: Viewport, canvas: Canvas) -> Self {
        let vp = Viewport::new(viewport.width, viewport.height);
        let cw = f64::from(canvas.width);
        let ch = f64::from(canvas.height);
        let scale = (vp.width / cw).min(vp.height / ch).min(1.0);
        let offset = Vec2::new((vp.width - cw * scale) / 2.0, (vp.height - ch * scale) / 2.0);
        let crop = Rect::new(
            offset.x,
            offset.y,
            offset.x + cw * scale,
            offset.y + ch * scale,
        );
        Self {
            scale,
            offset,
            crop,
            pixel_ratio: 1.0 / scale,
        }
    }

    /// Output pixel dimensions of an export taken through this fit.
    pub fn output_size(&self) -> (u32, u32) {
        let w = (self.crop.width() * self.pixel_ratio).round().max(1.0);
        let h = (self.crop.height() * self.pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/stage.rs"]
mod tests;
