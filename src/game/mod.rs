// Game logic: the player character, the level and the world tying them together

pub mod characters;
pub mod level;
pub mod world;

pub use world::GameWorld;
