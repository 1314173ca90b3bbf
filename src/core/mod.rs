// Core types shared by engine and game code

pub mod math;

pub use math::Rect;
