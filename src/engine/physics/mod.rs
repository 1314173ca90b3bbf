// Kinematic platformer physics: gravity integration and tile collision

pub mod body;
mod collision;

pub use body::{BodyBuilder, PhysicsBody};
pub use collision::{resolve, ContactFlags};
