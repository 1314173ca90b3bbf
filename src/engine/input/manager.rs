// Input manager - tracks held keys and answers action queries

use super::action::Action;
use super::config::InputConfig;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard state for the local player
///
/// Fed with winit key events as they arrive; polled once per frame.
pub struct InputManager {
    /// Key bindings
    config: InputConfig,

    /// Keys currently held down
    pressed_keys: HashSet<KeyCode>,
}

impl InputManager {
    /// Create a new input manager with the given bindings
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            pressed_keys: HashSet::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            match event.state {
                ElementState::Pressed => self.press(key_code),
                ElementState::Released => self.release(key_code),
            }
        }
    }

    /// Register a key press
    pub fn press(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    /// Register a key release
    pub fn release(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    /// Check if any key bound to `action` is held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.config
            .get_keys(action)
            .iter()
            .any(|key| self.pressed_keys.contains(key))
    }

    /// Forget every held key (e.g. when the window loses focus)
    pub fn reset(&mut self) {
        self.pressed_keys.clear();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}
