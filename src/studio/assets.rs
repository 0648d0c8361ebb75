use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::CreativeResult;

/// Decode any format the `image` crate understands into straight-alpha RGBA.
pub fn decode_image(bytes: &[u8]) -> CreativeResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Decoded images referenced by image layers through their `src` key.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, Arc<RgbaImage>>,
}

impl ImageStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `image` under a fresh key and return the key.
    pub fn insert(&mut self, image: RgbaImage) -> String {
        let key = format!("img_{}", uuid::Uuid::new_v4().simple());
        self.images.insert(key.clone(), Arc::new(image));
        key
    }

    /// Pixels stored under `key`.
    pub fn get(&self, key: &str) -> Option<Arc<RgbaImage>> {
        self.images.get(key).cloned()
    }

    /// Drop the pixels stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Arc<RgbaImage>> {
        self.images.remove(key)
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.images.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/assets.rs"]
mod tests;
