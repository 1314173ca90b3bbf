use glam::Vec2;

use crate::core::Rect;

/// Which sides of a moving rectangle were clamped against a tile during one
/// `resolve` call
///
/// Produced fresh every call; callers derive grounded/ceiling state from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Move `rect` by `movement` against static `solids`, one axis at a time
///
/// The horizontal pass runs first on the un-moved y, then the vertical pass on
/// the corrected x. On each axis every tile overlapping after the displacement
/// clamps the matching edge, in slice order, so with several overlapping tiles
/// the last one wins. An axis with zero displacement never sets a flag, even
/// if the rectangle already overlaps something.
pub fn resolve(rect: Rect, movement: Vec2, solids: &[Rect]) -> (Rect, ContactFlags) {
    let mut rect = rect;
    let mut contacts = ContactFlags::default();

    rect.x += movement.x;
    if movement.x != 0.0 {
        for tile in overlapping(&rect, solids) {
            if movement.x > 0.0 {
                rect.set_right(tile.left());
                contacts.right = true;
            } else {
                rect.set_left(tile.right());
                contacts.left = true;
            }
        }
    }

    rect.y += movement.y;
    if movement.y != 0.0 {
        for tile in overlapping(&rect, solids) {
            if movement.y > 0.0 {
                rect.set_bottom(tile.top());
                contacts.bottom = true;
            } else {
                rect.set_top(tile.bottom());
                contacts.top = true;
            }
        }
    }

    (rect, contacts)
}

/// Tiles overlapping `rect`, collected before any clamp is applied
fn overlapping(rect: &Rect, solids: &[Rect]) -> Vec<Rect> {
    solids
        .iter()
        .filter(|tile| rect.overlaps(tile))
        .copied()
        .collect()
}
