// World-space tile placement and collision rectangles

use crate::core::Rect;
use crate::engine::assets::Image;

use super::map::TileMapData;

/// A tile image at its world position
#[derive(Debug, Clone)]
pub struct PlacedTile {
    pub rect: Rect,
    pub image: Image,
}

/// Static level geometry, built once after the map loads
#[derive(Debug, Clone, Default)]
pub struct TileGeometry {
    /// Drawable tiles in layer order
    tiles: Vec<PlacedTile>,
    /// Collision rects of every tile in a solid layer
    solids: Vec<Rect>,
}

impl TileGeometry {
    /// Place every non-empty cell of every visible layer
    pub fn from_map(map: &TileMapData) -> Self {
        let (tw, th) = (map.tile_width as f32, map.tile_height as f32);
        let mut geometry = Self::default();

        for layer in map.layers.iter().filter(|layer| layer.visible) {
            for (column, row, gid) in layer.cells() {
                let Some(image) = map.tile_image(gid) else {
                    continue;
                };
                let rect = Rect::new(column as f32 * tw, row as f32 * th, tw, th);

                if layer.solid {
                    geometry.solids.push(rect);
                }
                geometry.tiles.push(PlacedTile {
                    rect,
                    image: image.clone(),
                });
            }
        }

        geometry
    }

    pub fn solid_rects(&self) -> &[Rect] {
        &self.solids
    }

    /// Tiles intersecting `view`, in layer order
    pub fn visible_tiles<'a>(&'a self, view: &'a Rect) -> impl Iterator<Item = &'a PlacedTile> + 'a {
        self.tiles.iter().filter(move |tile| tile.rect.overlaps(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::map::tests::sample_map;

    #[test]
    fn test_places_visible_layers_only() {
        let geometry = TileGeometry::from_map(&sample_map());

        // ground has 4 tiles, decor 1, the hidden layer none
        let everything = Rect::new(-1000.0, -1000.0, 2000.0, 2000.0);
        let tiles: Vec<Rect> = geometry.visible_tiles(&everything).map(|tile| tile.rect).collect();
        assert_eq!(tiles.len(), 5);
        assert_eq!(tiles[0], Rect::new(96.0, 0.0, 48.0, 48.0));
        assert_eq!(tiles[4], Rect::new(0.0, 0.0, 48.0, 48.0));
    }

    #[test]
    fn test_solid_rects() {
        let geometry = TileGeometry::from_map(&sample_map());

        assert_eq!(
            geometry.solid_rects(),
            &[
                Rect::new(96.0, 0.0, 48.0, 48.0),
                Rect::new(0.0, 48.0, 48.0, 48.0),
                Rect::new(48.0, 48.0, 48.0, 48.0),
                Rect::new(96.0, 48.0, 48.0, 48.0),
            ]
        );
    }

    #[test]
    fn test_visible_tiles_culls() {
        let geometry = TileGeometry::from_map(&sample_map());

        let view = Rect::new(0.0, 40.0, 60.0, 60.0);
        let visible: Vec<Rect> = geometry.visible_tiles(&view).map(|tile| tile.rect).collect();
        assert_eq!(
            visible,
            vec![
                Rect::new(0.0, 48.0, 48.0, 48.0),
                Rect::new(48.0, 48.0, 48.0, 48.0),
                Rect::new(0.0, 0.0, 48.0, 48.0),
            ]
        );

        // Sharing an edge is not on screen
        let edge = Rect::new(144.0, 0.0, 100.0, 100.0);
        assert_eq!(geometry.visible_tiles(&edge).count(), 0);
    }
}
