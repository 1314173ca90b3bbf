// Game action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Jump,

    // Combat
    Attack,

    // Meta actions
    Quit,
}

/// Default keyboard bindings
///
/// Jump has two keys; releasing one while the other is held keeps the
/// action pressed.
pub fn default_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        (KeyCode::KeyA, Action::MoveLeft),
        (KeyCode::KeyD, Action::MoveRight),
        (KeyCode::KeyW, Action::Jump),
        (KeyCode::Space, Action::Jump),
        (KeyCode::KeyK, Action::Attack),
        (KeyCode::Escape, Action::Quit),
    ]
}
