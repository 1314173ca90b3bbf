// Asset loading functionality

use super::{AssetError, AssetId, Image};
use log::debug;
use std::path::{Path, PathBuf};

/// Extension used for numbered animation frames (`0.png`, `1.png`, ...)
pub const FRAME_EXTENSION: &str = "png";

/// Asset loader responsible for finding and decoding asset files
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path<P: AsRef<Path>>(&self, name: P) -> PathBuf {
        self.base_path.join(name)
    }

    /// Load and decode a single image
    pub fn load_image<P: AsRef<Path>>(&self, name: P) -> Result<Image, AssetError> {
        let path = self.resolve_path(&name);

        if !path.is_file() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let pixels = image::open(&path)
            .map_err(|source| AssetError::Decode {
                path: path.display().to_string(),
                source,
            })?
            .to_rgba8();

        let key = name.as_ref().to_string_lossy().replace('\\', "/");
        debug!("Loaded image {} ({}x{})", key, pixels.width(), pixels.height());

        Ok(Image::new(AssetId::from_path(&key), pixels))
    }

    /// Load `count` numbered frames `dir/0.png .. dir/{count-1}.png` in order
    pub fn load_image_sequence<P: AsRef<Path>>(
        &self,
        dir: P,
        count: usize,
    ) -> Result<Vec<Image>, AssetError> {
        (0..count)
            .map(|index| {
                self.load_image(
                    dir.as_ref()
                        .join(format!("{}.{}", index, FRAME_EXTENSION)),
                )
            })
            .collect()
    }
}
