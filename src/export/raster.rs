use std::collections::BTreeMap;

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

use crate::catalog::format::{Format, FormatKey};
use crate::export::surface::{Codec, EncodeRequest, Quality, RenderSurface, SurfaceReady};
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::geometry::stage::{StageFit, Viewport};
use crate::layer::model::Layer;

/// Background JPEG output is flattened onto; the stage is white.
const MATTE: [u8; 3] = [255, 255, 255];

/// Surface backed by host-provided stage captures.
///
/// Each capture is the stage as the host painted it for one format: straight-alpha RGBA at the
/// viewport's pixel size, with the canvas centered by [`StageFit`]. Encoding crops the canvas
/// region back out and rescales it to full format resolution.
#[derive(Debug)]
pub struct RasterSurface {
    viewport: Viewport,
    captures: BTreeMap<FormatKey, RgbaImage>,
    presented: Option<FormatKey>,
}

impl RasterSurface {
    /// Empty surface for a stage of `viewport` size.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Viewport::new(viewport.width, viewport.height),
            captures: BTreeMap::new(),
            presented: None,
        }
    }

    /// Stage size captures must match.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pixel size a capture must have.
    pub fn capture_size(&self) -> (u32, u32) {
        (
            self.viewport.width.round() as u32,
            self.viewport.height.round() as u32,
        )
    }

    /// Register the stage capture for `key`, replacing any previous one.
    pub fn insert_capture(&mut self, key: FormatKey, capture: RgbaImage) -> CreativeResult<()> {
        let expected = self.capture_size();
        if capture.dimensions() != expected {
            return Err(CreativeError::surface_unavailable(format!(
                "{key}: capture is {}x{}, stage is {}x{}",
                capture.width(),
                capture.height(),
                expected.0,
                expected.1
            )));
        }
        self.captures.insert(key, capture);
        Ok(())
    }

    /// Decode and register an encoded capture (PNG, JPEG, ...).
    pub fn insert_encoded_capture(&mut self, key: FormatKey, bytes: &[u8]) -> CreativeResult<()> {
        let capture = image::load_from_memory(bytes)
            .with_context(|| format!("decode stage capture for {key}"))?
            .to_rgba8();
        self.insert_capture(key, capture)
    }

    /// Format currently on screen.
    pub fn presented(&self) -> Option<FormatKey> {
        self.presented
    }
}

impl RenderSurface for RasterSurface {
    fn present(&mut self, format: &Format, _layers: &[Layer]) -> CreativeResult<SurfaceReady> {
        if !self.captures.contains_key(&format.key) {
            return Err(CreativeError::surface_unavailable(format!(
                "no stage capture for {}",
                format.key
            )));
        }
        let fit = StageFit::fit(self.viewport, format.canvas());
        let ready = SurfaceReady::new(format, fit.crop, fit.pixel_ratio)?;
        self.presented = Some(format.key);
        Ok(ready)
    }

    fn encode(&mut self, ready: &SurfaceReady, request: &EncodeRequest) -> CreativeResult<Vec<u8>> {
        if self.presented != Some(ready.format()) {
            return Err(CreativeError::surface_unavailable(format!(
                "{} is not on screen",
                ready.format()
            )));
        }
        let capture = self.captures.get(&ready.format()).ok_or_else(|| {
            CreativeError::surface_unavailable(format!("no stage capture for {}", ready.format()))
        })?;
        let pixels = crop_and_scale(capture, request)?;
        encode_rgba(&pixels, request.codec, request.quality)
    }
}

fn crop_and_scale(capture: &RgbaImage, request: &EncodeRequest) -> CreativeResult<RgbaImage> {
    let crop = request.crop;
    let x0 = crop.x0.round().max(0.0) as u32;
    let y0 = crop.y0.round().max(0.0) as u32;
    let x1 = (crop.x1.round().max(0.0) as u32).min(capture.width());
    let y1 = (crop.y1.round().max(0.0) as u32).min(capture.height());
    if x1 <= x0 || y1 <= y0 {
        return Err(CreativeError::surface_unavailable(
            "crop region lies outside the stage capture",
        ));
    }

    let region = imageops::crop_imm(capture, x0, y0, x1 - x0, y1 - y0).to_image();
    let out_w = (crop.width() * request.pixel_ratio).round().max(1.0) as u32;
    let out_h = (crop.height() * request.pixel_ratio).round().max(1.0) as u32;
    if region.dimensions() == (out_w, out_h) {
        return Ok(region);
    }
    Ok(imageops::resize(&region, out_w, out_h, FilterType::Triangle))
}

/// Encode straight-alpha RGBA pixels.
///
/// PNG keeps the alpha channel. JPEG flattens onto white first and uses `quality`
/// (full quality when absent).
pub fn encode_rgba(
    pixels: &RgbaImage,
    codec: Codec,
    quality: Option<Quality>,
) -> CreativeResult<Vec<u8>> {
    let mut out = Vec::new();
    match codec {
        Codec::Png => {
            PngEncoder::new(&mut out)
                .write_image(
                    pixels.as_raw(),
                    pixels.width(),
                    pixels.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| CreativeError::encode(format!("png: {e}")))?;
        }
        Codec::Jpeg => {
            let q = quality.unwrap_or(Quality::MAX).hundredths().max(1);
            let rgb = flatten_onto(pixels, MATTE);
            JpegEncoder::new_with_quality(&mut out, q)
                .encode_image(&rgb)
                .map_err(|e| CreativeError::encode(format!("jpeg q={q}: {e}")))?;
        }
    }
    Ok(out)
}

fn flatten_onto(pixels: &RgbaImage, matte: [u8; 3]) -> RgbImage {
    let mut rgb = RgbImage::new(pixels.width(), pixels.height());
    for (dst, src) in rgb.pixels_mut().zip(pixels.pixels()) {
        let a = u16::from(src[3]);
        for c in 0..3 {
            let fg = u16::from(src[c]) * a;
            let bg = u16::from(matte[c]) * (255 - a);
            dst[c] = ((fg + bg + 127) / 255) as u8;
        }
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/export/raster.rs"]
mod tests;
