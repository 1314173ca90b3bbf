// Asset management system
//
// Loads images once at startup and shares them read-only for the rest of
// the run.

mod handle;
mod image;
mod loader;
mod manager;

pub use handle::AssetId;
pub use image::Image;
pub use loader::AssetLoader;
pub use manager::AssetManager;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: ::image::ImageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("Kuro/Idle/0.png".to_string());
        assert_eq!(err.to_string(), "Asset not found: Kuro/Idle/0.png");
    }
}
