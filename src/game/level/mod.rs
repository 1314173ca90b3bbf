// Level: tile map geometry plus the background
//
// - `map`: RON level files and tileset slicing
// - `geometry`: world-space tile placement and collision rects
// - `background`: full-screen sky with optional parallax

pub mod background;
pub mod geometry;
pub mod map;

pub use background::Background;
pub use geometry::{PlacedTile, TileGeometry};
pub use map::{TileMapData, TileMapLoader};

use crate::core::Rect;
use crate::engine::assets::AssetError;

/// Map loading errors
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Failed to read map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse map: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Malformed map: {0}")]
    Malformed(String),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Everything static about the stage the player runs on
#[derive(Debug, Clone)]
pub struct Level {
    geometry: TileGeometry,
    background: Background,
}

impl Level {
    pub fn new(map: &TileMapData, background: Background) -> Self {
        Self {
            geometry: TileGeometry::from_map(map),
            background,
        }
    }

    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    pub fn solid_rects(&self) -> &[Rect] {
        self.geometry.solid_rects()
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut Background {
        &mut self.background
    }
}
