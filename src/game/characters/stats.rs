// Character stats - movement tuning for the player character
//
// Values are per reference frame (1/60 s) and get scaled by the measured
// frame time at runtime.

use serde::Deserialize;

use crate::engine::physics::{BodyBuilder, PhysicsBody};

/// Movement and hitbox tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    // Movement
    /// Horizontal speed while a direction is held (px/frame)
    pub run_speed: f32,
    /// Vertical velocity set when a jump starts (negative is up)
    pub jump_velocity: f32,

    // Physics
    /// Downward acceleration (px/frame^2)
    pub gravity: f32,
    /// Maximum fall speed (px/frame)
    pub terminal_velocity: f32,
    /// Downward velocity after bumping a ceiling, so the body detaches
    pub ceiling_bounce: f32,

    // Dimensions
    /// Fraction of the sprite width trimmed off the hitbox
    pub hitbox_inset_x: f32,
    /// Fraction of the sprite height trimmed off the hitbox
    pub hitbox_inset_y: f32,
}

pub const BASE_STATS: CharacterStats = CharacterStats {
    run_speed: 6.0,
    jump_velocity: -15.0,

    gravity: 0.6,
    terminal_velocity: 9.0,
    ceiling_bounce: 1.0,

    hitbox_inset_x: 0.3,
    hitbox_inset_y: 0.1,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    /// A grounded body tuned with these stats
    pub fn body(&self) -> PhysicsBody {
        BodyBuilder::new()
            .gravity(self.gravity)
            .terminal_velocity(self.terminal_velocity)
            .ceiling_bounce(self.ceiling_bounce)
            .build()
    }
}
