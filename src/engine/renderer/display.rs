// What the game draws through: a display surface and things that can be drawn

use glam::Vec2;

use crate::core::Rect;
use crate::engine::assets::Image;

/// An image reference plus how to orient it
#[derive(Debug, Clone, Copy)]
pub struct Sprite<'a> {
    pub image: &'a Image,
    /// Mirror around the vertical axis
    pub flip_horizontal: bool,
}

impl<'a> Sprite<'a> {
    pub fn new(image: &'a Image) -> Self {
        Self {
            image,
            flip_horizontal: false,
        }
    }
}

/// A render target that accepts sprites at screen positions
///
/// `present` queues a sprite with its top-left corner at `position`
/// (screen pixels, y down); `flip` commits everything queued this frame.
pub trait Display {
    /// Drawable size in pixels
    fn size(&self) -> (u32, u32);

    fn present(&mut self, sprite: Sprite<'_>, position: Vec2);

    fn flip(&mut self) -> anyhow::Result<()>;
}

/// An entity the camera can depth-sort and draw
pub trait Drawable {
    /// World-space bounds of the visual sprite
    fn rect(&self) -> Rect;

    /// The frame to draw this tick
    fn sprite(&self) -> Sprite<'_>;
}
