// Math utilities: axis-aligned rectangles in world pixel space

use glam::Vec2;

/// Axis-aligned rectangle in world pixel coordinates
///
/// `x`/`y` is the top-left corner, y grows downward (screen convention).
/// Edge setters move the rectangle without resizing it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle; negative sizes are clamped to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Create a rectangle from its top-left corner and size
    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Move the rectangle so its center lands on `center`
    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    /// Resize around the current center
    pub fn set_size(&mut self, size: Vec2) {
        let center = self.center();
        self.width = size.x.max(0.0);
        self.height = size.y.max(0.0);
        self.set_center(center);
    }

    /// Grow (or shrink, with negative amounts) around the center.
    /// `dw`/`dh` are the total change in width/height.
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        let mut rect = Self::new(self.x, self.y, self.width + dw, self.height + dh);
        rect.set_center(self.center());
        rect
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
