// Shared, immutable CPU-side images

use glam::Vec2;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::sync::Arc;

use super::AssetId;

/// A decoded RGBA image shared by reference
///
/// Cloning is cheap (the pixels live behind an `Arc`). The renderer uploads
/// each `AssetId` to the GPU once per image size.
#[derive(Debug, Clone)]
pub struct Image {
    id: AssetId,
    pixels: Arc<RgbaImage>,
}

impl Image {
    pub fn new(id: AssetId, pixels: RgbaImage) -> Self {
        Self {
            id,
            pixels: Arc::new(pixels),
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Same pixels under another id
    pub fn with_id(mut self, id: AssetId) -> Self {
        self.id = id;
        self
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Native size in pixels
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// Nearest-neighbour resize, keeping pixel art crisp
    pub fn resized(&self, width: u32, height: u32) -> Self {
        if width == self.width() && height == self.height() {
            return self.clone();
        }
        let pixels = imageops::resize(self.pixels.as_ref(), width, height, FilterType::Nearest);
        Self::new(self.id.derive(&format!("{}x{}", width, height)), pixels)
    }

    /// Resize by an integer factor
    pub fn scaled(&self, factor: u32) -> Self {
        self.resized(self.width() * factor, self.height() * factor)
    }

    /// Copy out a sub-rectangle
    pub fn cropped(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let pixels = imageops::crop_imm(self.pixels.as_ref(), x, y, width, height).to_image();
        Self::new(
            self.id.derive(&format!("crop {},{} {}x{}", x, y, width, height)),
            pixels,
        )
    }
}
