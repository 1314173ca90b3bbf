// Character state, as observed after an update

/// Represents the current state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving horizontally on ground
    Running,
    /// Jumping or falling
    Airborne,
    /// Playing the attack animation; movement input is ignored
    Attacking,
}

impl CharacterState {
    /// Derive the state from the character's flags. Attacking wins over
    /// airborne, airborne over running.
    pub fn from_flags(attacking: bool, airborne: bool, moving: bool) -> Self {
        if attacking {
            Self::Attacking
        } else if airborne {
            Self::Airborne
        } else if moving {
            Self::Running
        } else {
            Self::Idle
        }
    }
}
