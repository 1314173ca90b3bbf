use glam::Vec2;

use super::collision::{resolve, ContactFlags};
use crate::core::Rect;

/// Builder for creating kinematic bodies with common configurations
pub struct BodyBuilder {
    gravity: f32,
    terminal_velocity: f32,
    ceiling_bounce: f32,
    velocity_y: f32,
    airborne: bool,
}

impl BodyBuilder {
    /// Create a new body builder with the standard platformer tuning
    pub fn new() -> Self {
        Self {
            gravity: 0.6,
            terminal_velocity: 9.0,
            ceiling_bounce: 1.0,
            velocity_y: 0.0,
            airborne: false,
        }
    }

    /// Set the gravity acceleration (px per reference frame squared)
    pub fn gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the maximum fall speed (px per reference frame)
    pub fn terminal_velocity(mut self, terminal_velocity: f32) -> Self {
        self.terminal_velocity = terminal_velocity;
        self
    }

    /// Set the downward velocity applied after bumping into a ceiling
    pub fn ceiling_bounce(mut self, ceiling_bounce: f32) -> Self {
        self.ceiling_bounce = ceiling_bounce;
        self
    }

    /// Set the initial vertical velocity
    pub fn velocity_y(mut self, velocity_y: f32) -> Self {
        self.velocity_y = velocity_y;
        self
    }

    /// Start in the air
    pub fn airborne(mut self, airborne: bool) -> Self {
        self.airborne = airborne;
        self
    }

    /// Build the body
    pub fn build(self) -> PhysicsBody {
        PhysicsBody {
            gravity: self.gravity,
            terminal_velocity: self.terminal_velocity,
            ceiling_bounce: self.ceiling_bounce,
            velocity_y: self.velocity_y,
            airborne: self.airborne,
        }
    }
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertical motion state of a kinematic entity
///
/// Velocities are in pixels per reference frame (1/60 s); every step takes a
/// `scale` (measured frame time over the reference frame time) so motion
/// stays the same under frame-rate variance.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    gravity: f32,
    terminal_velocity: f32,
    ceiling_bounce: f32,
    velocity_y: f32,
    airborne: bool,
}

impl PhysicsBody {
    /// Current vertical velocity (positive is down)
    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    /// Whether the body is jumping or falling
    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Start a jump with the given (negative, upward) velocity.
    /// Returns false when already airborne; there is no double jump.
    pub fn jump(&mut self, velocity: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.velocity_y = velocity;
        self.airborne = true;
        true
    }

    /// Accelerate by gravity, clamp to terminal velocity and return the
    /// vertical displacement for this step
    pub fn integrate(&mut self, scale: f32) -> f32 {
        self.velocity_y = (self.velocity_y + self.gravity * scale).min(self.terminal_velocity);
        self.velocity_y * scale
    }

    /// Update velocity and airborne state from the contacts of the last move.
    /// Floor contact wins over ceiling contact.
    pub fn apply_contacts(&mut self, contacts: &ContactFlags) {
        if contacts.bottom {
            self.velocity_y = 0.0;
            self.airborne = false;
        } else if contacts.top {
            self.velocity_y = self.ceiling_bounce;
            self.airborne = true;
        } else {
            self.airborne = true;
        }
    }

    /// Integrate gravity, move `hitbox` by `horizontal` plus the fall
    /// displacement against `solids`, and sync state from the contacts
    pub fn step(
        &mut self,
        hitbox: Rect,
        horizontal: f32,
        scale: f32,
        solids: &[Rect],
    ) -> (Rect, ContactFlags) {
        let vertical = self.integrate(scale);
        let (hitbox, contacts) = resolve(hitbox, Vec2::new(horizontal, vertical), solids);
        self.apply_contacts(&contacts);
        (hitbox, contacts)
    }
}

impl Default for PhysicsBody {
    fn default() -> Self {
        BodyBuilder::new().build()
    }
}
