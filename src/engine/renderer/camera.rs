// Camera: follows a target and decides draw order

use glam::Vec2;

use super::display::{Display, Drawable};
use crate::core::Rect;

/// 2D camera that keeps a target centered on screen
///
/// The offset is recomputed from the target every frame; there is no
/// smoothing or lag.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World position of the screen's top-left corner
    offset: Vec2,
    /// Viewport width
    viewport_width: f32,
    /// Viewport height
    viewport_height: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport_width,
            viewport_height,
        }
    }

    /// Put the target's center in the middle of the viewport
    pub fn center_on(&mut self, target: &Rect) {
        self.offset = target.center() - self.half_extents();
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// World-to-screen translation subtracted from every blit position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Convert world coordinates to screen coordinates
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.offset
    }

    /// World-space area currently on screen
    pub fn view_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.viewport_width,
            self.viewport_height,
        )
    }

    /// Indices of `entities` in draw order: ascending vertical center, ties
    /// kept in insertion order, so lower entities draw on top
    pub fn draw_order<D: Drawable + ?Sized>(&self, entities: &[&D]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..entities.len()).collect();
        // `sort_by` is stable
        order.sort_by(|&a, &b| {
            entities[a]
                .rect()
                .center()
                .y
                .total_cmp(&entities[b].rect().center().y)
        });
        order
    }

    /// Blit every entity at its top-left minus the camera offset, in depth order
    pub fn draw<D: Drawable + ?Sized>(&self, entities: &[&D], display: &mut dyn Display) {
        for index in self.draw_order(entities) {
            let entity = entities[index];
            display.present(entity.sprite(), self.world_to_screen(entity.rect().top_left()));
        }
    }
}
