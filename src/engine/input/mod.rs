// Input handling system
//
// - `action`: game actions and their default keys
// - `config`: key-to-action bindings
// - `manager`: held-key tracking fed by winit events, polled once per frame
//
// ```rust
// let mut input = InputManager::default();
//
// // In the event loop
// input.process_keyboard_event(&key_event);
//
// // Once per frame
// if input.is_pressed(Action::Jump) {
//     // ...
// }
// ```

pub mod action;
pub mod config;
pub mod manager;

pub use action::Action;
pub use config::InputConfig;
pub use manager::InputManager;
