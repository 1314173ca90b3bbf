// Character system
//
// This module contains everything related to the playable character:
// - Character entity, per-frame intent and update
// - Character stats and properties
// - Observable state
// - Animation playback over shared frame sets

pub mod animation;
pub mod character;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::{AnimationController, AnimationError, AnimationKind, AnimationSet};
pub use character::{Character, Intent};
pub use state::CharacterState;
pub use stats::CharacterStats;
