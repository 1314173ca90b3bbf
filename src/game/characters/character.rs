// Player character: movement, attack and animation for one entity

use glam::Vec2;
use log::debug;
use std::sync::Arc;

use super::animation::{AnimationController, AnimationKind, AnimationSet};
use super::state::CharacterState;
use super::stats::CharacterStats;
use crate::core::Rect;
use crate::engine::game_loop::frame_scale;
use crate::engine::input::{Action, InputManager};
use crate::engine::physics::{ContactFlags, PhysicsBody};
use crate::engine::renderer::{Drawable, Sprite};

/// What the player asked for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
}

impl Intent {
    /// Snapshot the held keys
    pub fn from_input(input: &InputManager) -> Self {
        Self {
            left: input.is_pressed(Action::MoveLeft),
            right: input.is_pressed(Action::MoveRight),
            jump: input.is_pressed(Action::Jump),
            attack: input.is_pressed(Action::Attack),
        }
    }
}

/// The player-controlled character
///
/// `rect` is the visual bounds and follows the current frame's size;
/// `hitbox` is a centered shrink of it and is the only thing that collides.
#[derive(Debug, Clone)]
pub struct Character {
    rect: Rect,
    hitbox: Rect,
    animation: AnimationController,
    body: PhysicsBody,
    stats: CharacterStats,
    attacking: bool,
    /// Net horizontal displacement this frame was non-zero
    moving: bool,
}

impl Character {
    /// Create a grounded character whose first Idle frame has its top-left
    /// corner at `spawn`
    pub fn new(
        spawn: Vec2,
        set: Arc<AnimationSet>,
        stats: CharacterStats,
        frame_duration_ms: f32,
    ) -> Self {
        let animation = AnimationController::with_frame_duration(set, frame_duration_ms);
        let rect = Rect::from_top_left(spawn, animation.current_frame().image.size());
        let hitbox = hitbox_for(&rect, &stats);

        Self {
            rect,
            hitbox,
            animation,
            body: stats.body(),
            stats,
            attacking: false,
            moving: false,
        }
    }

    /// Advance one frame of `dt_ms` milliseconds against the static `solids`.
    /// Returns the contacts of this frame's move.
    pub fn update(&mut self, dt_ms: f32, intent: &Intent, solids: &[Rect]) -> ContactFlags {
        let scale = frame_scale(dt_ms);
        let mut dx = 0.0;

        if self.attacking {
            if self.animation.has_reached_last_frame() {
                self.attacking = false;
                debug!("Attack finished");
            }
        } else {
            let step = self.stats.run_speed * scale;
            if intent.left {
                dx -= step;
                self.animation.set_flip_horizontal(true);
            }
            if intent.right {
                dx += step;
                self.animation.set_flip_horizontal(false);
            }

            if intent.jump && self.body.jump(self.stats.jump_velocity) {
                debug!("Jump started at y = {:.1}", self.hitbox.bottom());
            }

            if intent.attack {
                self.attacking = true;
                self.animation.select(AnimationKind::Attack);
                debug!("Attack started");
            } else if dx != 0.0 {
                self.animation.select(AnimationKind::Run);
            } else {
                self.animation.select(AnimationKind::Idle);
            }
        }
        self.moving = dx != 0.0;

        // Gravity is applied before the move, so the first rise of a jump is
        // jump_velocity + gravity * scale (-14.4 at 60 FPS), not -15
        let was_airborne = self.body.is_airborne();
        let (hitbox, contacts) = self.body.step(self.hitbox, dx, scale, solids);
        self.hitbox = hitbox;
        self.rect.set_center(hitbox.center());

        if was_airborne && contacts.bottom {
            debug!("Landed at y = {:.1}", hitbox.bottom());
        }

        self.animation.advance(dt_ms);
        self.rect.set_size(self.animation.current_frame().image.size());
        self.hitbox = hitbox_for(&self.rect, &self.stats);

        contacts
    }

    /// The state this frame's update left the character in
    pub fn state(&self) -> CharacterState {
        CharacterState::from_flags(self.attacking, self.body.is_airborne(), self.moving)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    pub fn velocity_y(&self) -> f32 {
        self.body.velocity_y()
    }

    pub fn is_airborne(&self) -> bool {
        self.body.is_airborne()
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }
}

impl Drawable for Character {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> Sprite<'_> {
        self.animation.current_frame()
    }
}

fn hitbox_for(rect: &Rect, stats: &CharacterStats) -> Rect {
    rect.inflate(
        -rect.width * stats.hitbox_inset_x,
        -rect.height * stats.hitbox_inset_y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::REFERENCE_FRAME_MS;
    use crate::game::characters::animation::tests::{standard_set, uniform_set};
    use approx::assert_relative_eq;

    const DT: f32 = REFERENCE_FRAME_MS;

    fn character() -> Character {
        Character::new(
            Vec2::new(700.0, 1700.0),
            uniform_set(115),
            CharacterStats::default(),
            100.0,
        )
    }

    /// A floor tile whose top sits exactly under the hitbox
    fn floor_under(character: &Character) -> Rect {
        let hitbox = character.hitbox();
        Rect::new(hitbox.left() - 200.0, hitbox.bottom(), 600.0, 48.0)
    }

    fn walk_right() -> Intent {
        Intent {
            right: true,
            ..Intent::default()
        }
    }

    #[test]
    fn test_spawn_geometry() {
        let character = character();
        assert_eq!(character.rect(), Rect::new(700.0, 1700.0, 115.0, 115.0));

        let hitbox = character.hitbox();
        assert_relative_eq!(hitbox.width, 80.5);
        assert_relative_eq!(hitbox.height, 103.5);
        assert_eq!(hitbox.center(), character.rect().center());
        assert_eq!(character.state(), CharacterState::Idle);
    }

    #[test]
    fn test_rest_without_tiles() {
        let mut character = character();
        let contacts = character.update(DT, &Intent::default(), &[]);

        assert_relative_eq!(character.velocity_y(), 0.6);
        assert_eq!(contacts, ContactFlags::default());
        assert_eq!(character.animation().active(), AnimationKind::Idle);
        assert!(character.is_airborne());
    }

    #[test]
    fn test_standing_on_floor_stays_grounded() {
        let mut character = character();
        let floor = floor_under(&character);

        for _ in 0..30 {
            let contacts = character.update(DT, &Intent::default(), &[floor]);
            assert!(contacts.bottom);
            assert!(!character.is_airborne());
            assert_eq!(character.velocity_y(), 0.0);
            assert_relative_eq!(character.hitbox().bottom(), floor.top(), epsilon = 1e-3);
        }
        assert_eq!(character.state(), CharacterState::Idle);
    }

    #[test]
    fn test_wall_on_the_right() {
        let mut character = character();
        let hitbox = character.hitbox();
        let wall = Rect::new(hitbox.right() + 2.0, hitbox.top() - 50.0, 48.0, 48.0 * 4.0);

        let contacts = character.update(DT, &walk_right(), &[wall]);

        assert!(contacts.right);
        assert!(!contacts.left);
        assert_relative_eq!(character.hitbox().right(), wall.left(), epsilon = 1e-3);
        assert!(!character.animation().is_flipped_horizontal());
        assert_eq!(character.animation().active(), AnimationKind::Run);
    }

    #[test]
    fn test_run_moves_by_run_speed() {
        let mut character = character();
        let floor = floor_under(&character);
        let start = character.hitbox().center().x;

        character.update(DT, &walk_right(), &[floor]);
        assert_relative_eq!(character.hitbox().center().x, start + 6.0, epsilon = 1e-3);
        assert_eq!(character.state(), CharacterState::Running);

        character.update(
            DT,
            &Intent {
                left: true,
                ..Intent::default()
            },
            &[floor],
        );
        assert_relative_eq!(character.hitbox().center().x, start, epsilon = 1e-3);
        assert!(character.animation().is_flipped_horizontal());
    }

    #[test]
    fn test_movement_scales_with_frame_time() {
        let mut character = character();
        let floor = floor_under(&character);
        let start = character.hitbox().center().x;

        character.update(DT * 2.0, &walk_right(), &[floor]);
        assert_relative_eq!(character.hitbox().center().x, start + 12.0, epsilon = 1e-3);
    }

    #[test]
    fn test_both_directions_cancel() {
        let mut character = character();
        let floor = floor_under(&character);
        let start = character.hitbox().center().x;
        let both = Intent {
            left: true,
            right: true,
            ..Intent::default()
        };

        character.update(DT, &both, &[floor]);

        assert_relative_eq!(character.hitbox().center().x, start, epsilon = 1e-3);
        assert!(!character.animation().is_flipped_horizontal());
        assert_eq!(character.animation().active(), AnimationKind::Idle);
        assert_eq!(character.state(), CharacterState::Idle);
    }

    #[test]
    fn test_single_jump() {
        let mut character = character();
        let floor = floor_under(&character);
        let jump = Intent {
            jump: true,
            ..Intent::default()
        };

        character.update(DT, &jump, &[floor]);
        assert!(character.is_airborne());
        assert_relative_eq!(character.velocity_y(), -14.4);
        assert_eq!(character.state(), CharacterState::Airborne);

        // Holding jump in the air does not restart it
        character.update(DT, &jump, &[floor]);
        assert_relative_eq!(character.velocity_y(), -13.8);
    }

    #[test]
    fn test_jump_lands_back_on_floor() {
        let mut character = character();
        let floor = floor_under(&character);

        character.update(
            DT,
            &Intent {
                jump: true,
                ..Intent::default()
            },
            &[floor],
        );

        let mut landed = false;
        for _ in 0..120 {
            let contacts = character.update(DT, &Intent::default(), &[floor]);
            if contacts.bottom {
                landed = true;
                break;
            }
        }

        assert!(landed);
        assert!(!character.is_airborne());
        assert_eq!(character.velocity_y(), 0.0);
        assert_relative_eq!(character.hitbox().bottom(), floor.top(), epsilon = 1e-3);
    }

    #[test]
    fn test_ceiling_bounce() {
        let mut character = character();
        let floor = floor_under(&character);
        let hitbox = character.hitbox();
        let ceiling = Rect::new(hitbox.left() - 100.0, hitbox.top() - 60.0, 400.0, 48.0);

        let jump = Intent {
            jump: true,
            ..Intent::default()
        };

        // The ceiling is 12 px above the head, the first rising step hits it
        let contacts = character.update(DT, &jump, &[floor, ceiling]);
        assert!(contacts.top);
        assert!(!contacts.bottom);
        assert_eq!(character.velocity_y(), 1.0);
        assert!(character.is_airborne());
        assert_relative_eq!(character.hitbox().top(), ceiling.bottom(), epsilon = 1e-3);

        // Falls back down and lands
        let mut hit_floor = false;
        for _ in 0..30 {
            if character.update(DT, &Intent::default(), &[floor, ceiling]).bottom {
                hit_floor = true;
                break;
            }
        }
        assert!(hit_floor);
    }

    #[test]
    fn test_attack_runs_to_last_frame() {
        let mut character = character();
        let floor = floor_under(&character);
        let attack = Intent {
            attack: true,
            ..Intent::default()
        };

        character.update(DT, &attack, &[floor]);
        assert!(character.is_attacking());
        assert_eq!(character.state(), CharacterState::Attacking);
        assert_eq!(character.animation().active(), AnimationKind::Attack);

        // Movement is ignored mid-attack
        let x = character.hitbox().center().x;
        let mut frames = 1;
        while character.is_attacking() {
            character.update(100.0, &walk_right(), &[floor]);
            frames += 1;
            assert!(frames < 20, "attack never finished");
            if character.is_attacking() {
                assert_relative_eq!(character.hitbox().center().x, x, epsilon = 1e-3);
            }
        }

        // Three 100 ms steps reach the last of four frames, the next update clears
        assert_eq!(frames, 5);
        assert_eq!(character.state(), CharacterState::Running);
    }

    #[test]
    fn test_attack_finishes_with_short_frames() {
        let mut character = Character::new(
            Vec2::new(700.0, 1700.0),
            uniform_set(115),
            CharacterStats::default(),
            20.0,
        );
        let floor = floor_under(&character);
        let attack = Intent {
            attack: true,
            ..Intent::default()
        };

        // Every 40 ms update steps two frames, so frame 3 is never shown
        character.update(40.0, &attack, &[floor]);
        assert!(character.is_attacking());

        let mut updates = 0;
        while character.is_attacking() {
            character.update(40.0, &walk_right(), &[floor]);
            updates += 1;
            assert!(updates < 10, "attack never finished");
        }

        assert_eq!(updates, 2);
        assert_eq!(character.state(), CharacterState::Running);
    }

    #[test]
    fn test_rect_follows_frame_size() {
        let mut character = Character::new(
            Vec2::new(0.0, 0.0),
            standard_set(),
            CharacterStats::default(),
            100.0,
        );
        assert_eq!(character.rect().size(), Vec2::new(100.0, 110.0));
        let center = character.rect().center();

        character.update(100.0, &Intent::default(), &[]);

        // Idle frame 1 is 101x111
        let rect = character.rect();
        assert_eq!(rect.size(), Vec2::new(101.0, 111.0));
        assert_relative_eq!(character.hitbox().width, 101.0 * 0.7, epsilon = 1e-3);
        assert_relative_eq!(character.hitbox().height, 111.0 * 0.9, epsilon = 1e-3);
        assert_relative_eq!(character.hitbox().center().x, rect.center().x, epsilon = 1e-3);
        assert_relative_eq!(character.hitbox().center().y, rect.center().y, epsilon = 1e-3);
        assert_relative_eq!(rect.center().x, center.x, epsilon = 1e-3);
    }

    #[test]
    fn test_intent_from_input() {
        use winit::keyboard::KeyCode;

        let mut input = InputManager::default();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::Space);

        let intent = Intent::from_input(&input);
        assert_eq!(
            intent,
            Intent {
                left: true,
                jump: true,
                ..Intent::default()
            }
        );
    }
}
