// Central asset management system

use super::{AssetError, AssetLoader, Image};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Central asset manager for the game
///
/// Loads every image once; later requests for the same path return the
/// shared copy.
pub struct AssetManager {
    /// Asset loader
    loader: AssetLoader,

    /// Loaded images by relative path
    images: HashMap<PathBuf, Image>,
}

impl AssetManager {
    /// Create a new asset manager
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            images: HashMap::new(),
        }
    }

    /// Load an image from disk, or return the cached copy
    pub fn load_image<P: AsRef<Path>>(&mut self, name: P) -> Result<Image, AssetError> {
        let key = name.as_ref().to_path_buf();

        if let Some(image) = self.images.get(&key) {
            return Ok(image.clone());
        }

        let image = self.loader.load_image(&key)?;
        self.images.insert(key, image.clone());
        Ok(image)
    }

    /// Load `count` numbered frames from `dir`, each resized to `size` pixels
    pub fn load_animation<P: AsRef<Path>>(
        &mut self,
        dir: P,
        count: usize,
        size: (u32, u32),
    ) -> Result<Vec<Image>, AssetError> {
        let frames = self.loader.load_image_sequence(&dir, count)?;
        for (index, frame) in frames.iter().enumerate() {
            self.images
                .insert(dir.as_ref().join(format!("{}.png", index)), frame.clone());
        }

        info!(
            "Loaded animation {} ({} frames)",
            dir.as_ref().display(),
            frames.len()
        );

        Ok(frames
            .into_iter()
            .map(|frame| frame.resized(size.0, size.1))
            .collect())
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            image_count: self.images.len(),
        }
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy)]
pub struct AssetStats {
    pub image_count: usize,
}
