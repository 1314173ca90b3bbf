// Key-to-action bindings

use super::action::{default_bindings, Action};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Maps keys to game actions
///
/// One key triggers at most one action; one action may have several keys.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Mapping from keys to actions
    bindings: HashMap<KeyCode, Action>,

    /// Reverse mapping for quick lookups (action -> all keys)
    action_to_keys: HashMap<Action, Vec<KeyCode>>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            action_to_keys: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(KeyCode, Action)>) -> Self {
        let mut config = Self::new();
        for (key, action) in bindings {
            config.bind(key, action);
        }
        config
    }

    /// Bind a key to an action, replacing whatever the key did before
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.unbind_key(key);

        self.bindings.insert(key, action);
        self.action_to_keys.entry(action).or_default().push(key);
    }

    fn unbind_key(&mut self, key: KeyCode) {
        if let Some(action) = self.bindings.remove(&key) {
            if let Some(keys) = self.action_to_keys.get_mut(&action) {
                keys.retain(|k| *k != key);
                if keys.is_empty() {
                    self.action_to_keys.remove(&action);
                }
            }
        }
    }

    /// Get all keys bound to an action
    pub fn get_keys(&self, action: Action) -> &[KeyCode] {
        self.action_to_keys
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from_bindings(default_bindings())
    }
}
