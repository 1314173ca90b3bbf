// Character animation system

use serde::Deserialize;
use std::sync::Arc;

use crate::engine::assets::Image;
use crate::engine::renderer::Sprite;

/// Default time each frame stays on screen
pub const DEFAULT_FRAME_DURATION_MS: f32 = 100.0;

/// The named animation sets every character carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AnimationKind {
    Idle,
    Run,
    Jump,
    Attack,
}

impl AnimationKind {
    fn index(self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Run => 1,
            Self::Jump => 2,
            Self::Attack => 3,
        }
    }
}

/// Invalid animation configuration, rejected at construction
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnimationError {
    #[error("Animation {0:?} has no frames")]
    EmptyClip(AnimationKind),

    #[error("Animation {0:?} was not provided")]
    MissingClip(AnimationKind),
}

/// Frame sequences for every `AnimationKind`
///
/// Loaded once and shared read-only between characters through an `Arc`.
/// Every sequence is guaranteed non-empty.
#[derive(Debug)]
pub struct AnimationSet {
    clips: [Vec<Image>; 4],
}

impl AnimationSet {
    /// Build a set from `(kind, frames)` pairs; every kind must be present
    /// with at least one frame. A repeated kind replaces the earlier frames.
    pub fn from_clips<I>(clips: I) -> Result<Self, AnimationError>
    where
        I: IntoIterator<Item = (AnimationKind, Vec<Image>)>,
    {
        let mut slots: [Option<Vec<Image>>; 4] = Default::default();

        for (kind, frames) in clips {
            if frames.is_empty() {
                return Err(AnimationError::EmptyClip(kind));
            }
            slots[kind.index()] = Some(frames);
        }

        let [idle, run, jump, attack] = slots;
        Ok(Self {
            clips: [
                idle.ok_or(AnimationError::MissingClip(AnimationKind::Idle))?,
                run.ok_or(AnimationError::MissingClip(AnimationKind::Run))?,
                jump.ok_or(AnimationError::MissingClip(AnimationKind::Jump))?,
                attack.ok_or(AnimationError::MissingClip(AnimationKind::Attack))?,
            ],
        })
    }

    /// Frames of one animation
    pub fn frames(&self, kind: AnimationKind) -> &[Image] {
        &self.clips[kind.index()]
    }

    /// Number of frames in one animation (always at least 1)
    pub fn frame_count(&self, kind: AnimationKind) -> usize {
        self.clips[kind.index()].len()
    }
}

/// Per-entity animation playback over a shared `AnimationSet`
///
/// Frames loop forever. Only the index, the timer and the mirror flag belong
/// to the entity.
#[derive(Debug, Clone)]
pub struct AnimationController {
    set: Arc<AnimationSet>,
    active: AnimationKind,
    frame: usize,
    elapsed_ms: f32,
    frame_duration_ms: f32,
    flip_horizontal: bool,
    /// The active animation has shown or stepped past its final frame
    reached_last: bool,
}

impl AnimationController {
    /// Start on the first Idle frame
    pub fn new(set: Arc<AnimationSet>) -> Self {
        Self::with_frame_duration(set, DEFAULT_FRAME_DURATION_MS)
    }

    pub fn with_frame_duration(set: Arc<AnimationSet>, frame_duration_ms: f32) -> Self {
        Self {
            set,
            active: AnimationKind::Idle,
            frame: 0,
            elapsed_ms: 0.0,
            frame_duration_ms: frame_duration_ms.max(f32::EPSILON),
            flip_horizontal: false,
            reached_last: false,
        }
    }

    /// Switch the active animation. Selecting the one already playing does
    /// nothing, so frame continuity is kept.
    pub fn select(&mut self, kind: AnimationKind) {
        if self.active != kind {
            self.active = kind;
            self.frame = 0;
            self.elapsed_ms = 0.0;
            self.reached_last = false;
        }
    }

    /// Accumulate frame time; once a full frame duration has passed, step
    /// forward by the whole durations elapsed (wrapping) and reset the timer
    pub fn advance(&mut self, dt_ms: f32) {
        self.elapsed_ms += dt_ms.max(0.0);

        if self.elapsed_ms >= self.frame_duration_ms {
            let steps = (self.elapsed_ms / self.frame_duration_ms) as usize;
            let count = self.set.frame_count(self.active);
            if self.frame + steps >= count - 1 {
                self.reached_last = true;
            }
            self.frame = (self.frame + steps) % count;
            self.elapsed_ms = 0.0;
        }
    }

    /// The frame to draw, mirrored when facing left
    pub fn current_frame(&self) -> Sprite<'_> {
        Sprite {
            image: &self.set.frames(self.active)[self.frame],
            flip_horizontal: self.flip_horizontal,
        }
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    pub fn active(&self) -> AnimationKind {
        self.active
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Whether the active animation is showing its final frame
    pub fn is_on_last_frame(&self) -> bool {
        self.frame + 1 == self.set.frame_count(self.active)
    }

    /// Whether the active animation has shown its final frame since it was
    /// selected, even if a long step carried it past without stopping there
    pub fn has_reached_last_frame(&self) -> bool {
        self.reached_last || self.is_on_last_frame()
    }
}
