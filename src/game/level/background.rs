// Full-screen background with optional horizontal parallax

use glam::Vec2;

use crate::engine::assets::Image;

/// Sky image stretched to the viewport
///
/// `parallax` is the fraction of the camera's horizontal movement the image
/// follows: 0 pins it to the screen, 1 moves it with the world.
#[derive(Debug, Clone)]
pub struct Background {
    source: Image,
    image: Image,
    parallax: f32,
}

impl Background {
    pub fn new(source: Image, viewport: (u32, u32), parallax: f32) -> Self {
        let image = stretch(&source, viewport);
        Self {
            source,
            image,
            parallax,
        }
    }

    /// Re-stretch after a window resize
    pub fn resize(&mut self, viewport: (u32, u32)) {
        self.image = stretch(&self.source, viewport);
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Screen positions to draw the image at for this camera offset.
    /// A scrolling background needs two copies to cover the seam.
    pub fn placements(&self, camera_offset: Vec2) -> Vec<Vec2> {
        if self.parallax == 0.0 {
            return vec![Vec2::ZERO];
        }

        let width = self.image.width() as f32;
        let shift = (-camera_offset.x * self.parallax).rem_euclid(width);
        if shift == 0.0 {
            vec![Vec2::ZERO]
        } else {
            vec![Vec2::new(shift - width, 0.0), Vec2::new(shift, 0.0)]
        }
    }
}

/// Every stretched copy shares one id, so the renderer swaps the old texture
/// out instead of keeping one per window size
fn stretch(source: &Image, viewport: (u32, u32)) -> Image {
    source
        .resized(viewport.0.max(1), viewport.1.max(1))
        .with_id(source.id().derive("background"))
}
