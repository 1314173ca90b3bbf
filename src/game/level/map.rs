// Tile map loading from RON level files

use log::{debug, info};
use ron::Options;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::MapError;
use crate::engine::assets::{AssetManager, Image};

/// Default tile scale factor (source tiles are drawn 3x)
pub const DEFAULT_TILE_SCALE: u32 = 3;

/// A level file as written on disk
#[derive(Debug, Clone, Deserialize)]
pub struct MapDocument {
    /// Source tile size in pixels
    pub tile_width: u32,
    pub tile_height: u32,
    pub tileset: TilesetDef,
    /// Draw order: array order
    pub layers: Vec<LayerDef>,
}

/// One image atlas cut into a regular grid
#[derive(Debug, Clone, Deserialize)]
pub struct TilesetDef {
    /// Image path relative to the asset root
    pub image: String,
    pub columns: u32,
    pub tile_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerDef {
    pub name: String,
    #[serde(default = "enabled")]
    pub visible: bool,
    /// Whether the layer's tiles block movement
    #[serde(default = "enabled")]
    pub solid: bool,
    pub width: usize,
    pub height: usize,
    /// Row-major tile ids; 0 is empty, `n` is tileset tile `n - 1`
    pub data: Vec<u32>,
}

fn enabled() -> bool {
    true
}

/// A layer ready for placement: same grid, tile ids checked against the tileset
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub visible: bool,
    pub solid: bool,
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl TileLayer {
    /// Non-empty cells as (column, row, gid)
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &gid)| gid != 0)
            .map(move |(i, &gid)| (i % self.width, i / self.width, gid))
    }
}

/// A loaded map: scaled tile images plus layers
#[derive(Debug, Clone)]
pub struct TileMapData {
    /// On-screen tile size (source size times the scale factor)
    pub tile_width: u32,
    pub tile_height: u32,
    /// Scaled tile images, indexed by `gid - 1`
    pub tiles: Vec<Image>,
    pub layers: Vec<TileLayer>,
}

impl TileMapData {
    /// Image for a gid; `None` for 0 or out of range
    pub fn tile_image(&self, gid: u32) -> Option<&Image> {
        gid.checked_sub(1).and_then(|index| self.tiles.get(index as usize))
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Reads level files and cuts their tileset into scaled tile images
#[derive(Debug, Clone)]
pub struct TileMapLoader {
    scale: u32,
}

impl TileMapLoader {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    /// Load the level at `path`; the tileset image comes from `assets`
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        assets: &mut AssetManager,
    ) -> Result<TileMapData, MapError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let document = Self::parse(&source)?;
        let tileset = assets.load_image(&document.tileset.image)?;
        let map = self.build(document, &tileset)?;

        info!(
            "Loaded map {} ({} layers, {} tile images)",
            path.display(),
            map.layers.len(),
            map.tiles.len()
        );
        Ok(map)
    }

    /// Parse and validate a level document
    pub fn parse(source: &str) -> Result<MapDocument, MapError> {
        let document: MapDocument = ron_options().from_str(source)?;
        validate(&document)?;
        Ok(document)
    }

    /// Cut `tileset` into tiles and scale them
    pub fn build(&self, document: MapDocument, tileset: &Image) -> Result<TileMapData, MapError> {
        let (tw, th) = (document.tile_width, document.tile_height);
        let def = &document.tileset;
        let rows = def.tile_count.div_ceil(def.columns);
        let grid_width = checked_product(def.columns, tw, "tileset width")?;
        let grid_height = checked_product(rows, th, "tileset height")?;
        let tile_width = checked_product(tw, self.scale, "scaled tile width")?;
        let tile_height = checked_product(th, self.scale, "scaled tile height")?;

        if grid_width > tileset.width() || grid_height > tileset.height() {
            return Err(MapError::Malformed(format!(
                "tileset {} is {}x{}, too small for {} columns x {} rows of {}x{} tiles",
                def.image,
                tileset.width(),
                tileset.height(),
                def.columns,
                rows,
                tw,
                th
            )));
        }

        let tiles: Vec<Image> = (0..def.tile_count)
            .map(|index| {
                let (column, row) = (index % def.columns, index / def.columns);
                tileset
                    .cropped(column * tw, row * th, tw, th)
                    .scaled(self.scale)
            })
            .collect();
        debug!("Cut {} tiles from {}", tiles.len(), def.image);

        let layers = document
            .layers
            .into_iter()
            .map(|layer| TileLayer {
                name: layer.name,
                visible: layer.visible,
                solid: layer.solid,
                width: layer.width,
                height: layer.height,
                data: layer.data,
            })
            .collect();

        Ok(TileMapData {
            tile_width,
            tile_height,
            tiles,
            layers,
        })
    }
}

impl Default for TileMapLoader {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SCALE)
    }
}

fn validate(document: &MapDocument) -> Result<(), MapError> {
    if document.tile_width == 0 || document.tile_height == 0 {
        return Err(MapError::Malformed("tile size must be non-zero".into()));
    }

    let tileset = &document.tileset;
    if tileset.columns == 0 || tileset.tile_count == 0 {
        return Err(MapError::Malformed(format!(
            "tileset {} needs at least one column and one tile",
            tileset.image
        )));
    }

    for layer in &document.layers {
        let cells = layer.width.checked_mul(layer.height).ok_or_else(|| {
            MapError::Malformed(format!(
                "layer {} is too large ({}x{})",
                layer.name, layer.width, layer.height
            ))
        })?;
        if layer.data.len() != cells {
            return Err(MapError::Malformed(format!(
                "layer {} has {} cells, expected {}x{}",
                layer.name,
                layer.data.len(),
                layer.width,
                layer.height
            )));
        }

        if let Some(gid) = layer.data.iter().find(|&&gid| gid > tileset.tile_count) {
            return Err(MapError::Malformed(format!(
                "layer {} uses tile {} but the tileset has {}",
                layer.name, gid, tileset.tile_count
            )));
        }
    }

    Ok(())
}

fn checked_product(a: u32, b: u32, what: &str) -> Result<u32, MapError> {
    a.checked_mul(b)
        .ok_or_else(|| MapError::Malformed(format!("{} overflows ({} x {})", what, a, b)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::assets::AssetId;
    use image::{Rgba, RgbaImage};
    use std::io::Write;

    /// 2x2 grid of 16x16 tiles, one layer of 3x2 cells
    pub(crate) const SAMPLE: &str = r#"
        (
            tile_width: 16,
            tile_height: 16,
            tileset: (image: "Tiles/terrain.png", columns: 2, tile_count: 4),
            layers: [
                (
                    name: "ground",
                    width: 3,
                    height: 2,
                    data: [
                        0, 0, 1,
                        2, 3, 4,
                    ],
                ),
                (
                    name: "decor",
                    solid: false,
                    width: 3,
                    height: 2,
                    data: [
                        4, 0, 0,
                        0, 0, 0,
                    ],
                ),
                (
                    name: "hidden",
                    visible: false,
                    width: 3,
                    height: 2,
                    data: [
                        1, 1, 1,
                        1, 1, 1,
                    ],
                ),
            ],
        )
    "#;

    /// Each tile filled with a distinct red value
    pub(crate) fn tileset_image() -> Image {
        let pixels = RgbaImage::from_fn(32, 32, |x, y| {
            let index = (y / 16) * 2 + x / 16;
            Rgba([index as u8 * 60, 0, 0, 255])
        });
        Image::new(AssetId::from_path("Tiles/terrain.png"), pixels)
    }

    pub(crate) fn sample_map() -> TileMapData {
        let document = TileMapLoader::parse(SAMPLE).unwrap();
        TileMapLoader::default()
            .build(document, &tileset_image())
            .unwrap()
    }

    #[test]
    fn test_parse_defaults() {
        let document = TileMapLoader::parse(SAMPLE).unwrap();
        assert_eq!(document.layers.len(), 3);
        assert!(document.layers[0].visible && document.layers[0].solid);
        assert!(!document.layers[1].solid);
        assert!(!document.layers[2].visible);
    }

    #[test]
    fn test_build_scales_tiles() {
        let map = sample_map();
        assert_eq!((map.tile_width, map.tile_height), (48, 48));
        assert_eq!(map.tiles.len(), 4);
        assert!(map.tiles.iter().all(|tile| tile.width() == 48 && tile.height() == 48));

        // gid 3 is tileset index 2: bottom-left cell
        let tile = map.tile_image(3).unwrap();
        assert_eq!(tile.pixels().get_pixel(0, 0), &Rgba([120, 0, 0, 255]));
        assert!(map.tile_image(0).is_none());
        assert!(map.tile_image(5).is_none());
    }

    #[test]
    fn test_tile_images_are_distinct_assets() {
        let map = sample_map();
        assert_ne!(map.tiles[0].id(), map.tiles[1].id());
    }

    #[test]
    fn test_layer_cells() {
        let map = sample_map();
        let cells: Vec<_> = map.layers[0].cells().collect();
        assert_eq!(cells, vec![(2, 0, 1), (0, 1, 2), (1, 1, 3), (2, 1, 4)]);
    }

    #[test]
    fn test_shipped_level_parses() {
        let document = TileMapLoader::parse(include_str!("../../../assets/maps/level.ron")).unwrap();
        assert_eq!(document.layers.len(), 2);
        assert_eq!(document.layers[0].data.len(), 30 * 42);
    }

    #[test]
    fn test_wrong_cell_count() {
        let source = SAMPLE.replace("0, 0, 1,", "0, 0,");
        let err = TileMapLoader::parse(&source).unwrap_err();
        assert!(matches!(err, MapError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_gid_out_of_range() {
        let source = SAMPLE.replace("2, 3, 4,", "2, 3, 9,");
        let err = TileMapLoader::parse(&source).unwrap_err();
        assert!(err.to_string().contains("tile 9"));
    }

    #[test]
    fn test_syntax_error() {
        let err = TileMapLoader::parse("( tile_width: 16, ").unwrap_err();
        assert!(matches!(err, MapError::Parse(_)));
    }

    #[test]
    fn test_tileset_too_small() {
        let document = TileMapLoader::parse(SAMPLE).unwrap();
        let small = Image::new(AssetId::from_path("small"), RgbaImage::new(16, 16));
        let err = TileMapLoader::default().build(document, &small).unwrap_err();
        assert!(matches!(err, MapError::Malformed(_)));
    }

    #[test]
    fn test_oversized_tiles_rejected() {
        let source = SAMPLE
            .replace("tile_width: 16", "tile_width: 3000000000")
            .replace("columns: 2", "columns: 4");
        let document = TileMapLoader::parse(&source).unwrap();
        let err = TileMapLoader::default()
            .build(document, &tileset_image())
            .unwrap_err();
        assert!(matches!(err, MapError::Malformed(_)), "{err}");
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_oversized_layer_rejected() {
        let source = SAMPLE.replacen("width: 3,", "width: 18446744073709551615,", 1);
        let err = TileMapLoader::parse(&source).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Tiles")).unwrap();
        std::fs::create_dir_all(dir.path().join("maps")).unwrap();
        tileset_image()
            .pixels()
            .save(dir.path().join("Tiles/terrain.png"))
            .unwrap();
        let map_path = dir.path().join("maps/level.ron");
        std::fs::File::create(&map_path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();

        let mut assets = AssetManager::new(dir.path());
        let map = TileMapLoader::new(2).load(&map_path, &mut assets).unwrap();

        assert_eq!(map.tile_width, 32);
        assert_eq!(map.layers.len(), 3);
    }

    #[test]
    fn test_missing_map_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut assets = AssetManager::new(dir.path());
        let err = TileMapLoader::default()
            .load(dir.path().join("nope.ron"), &mut assets)
            .unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn test_missing_tileset() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("level.ron");
        std::fs::write(&map_path, SAMPLE).unwrap();

        let mut assets = AssetManager::new(dir.path());
        let err = TileMapLoader::default()
            .load(&map_path, &mut assets)
            .unwrap_err();
        assert!(matches!(err, MapError::Asset(_)));
    }
}
