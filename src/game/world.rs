// Game world: the level, the player and the camera that follows them

use anyhow::{Context, Result};
use glam::Vec2;
use log::{debug, info};
use std::sync::Arc;

use super::characters::{AnimationSet, Character, CharacterState, Intent};
use super::level::{Background, Level, TileMapLoader};
use crate::config::GameConfig;
use crate::engine::assets::AssetManager;
use crate::engine::renderer::{Camera, Display, Sprite};

/// Longest frame the simulation will step in one go
pub const MAX_FRAME_MS: f32 = 50.0;

/// Owns everything one play session needs
pub struct GameWorld {
    level: Level,
    player: Character,
    camera: Camera,
    last_state: CharacterState,
}

impl GameWorld {
    pub fn new(level: Level, player: Character, viewport: (u32, u32)) -> Self {
        let mut camera = Camera::new(viewport.0 as f32, viewport.1 as f32);
        camera.center_on(&player.rect());

        Self {
            level,
            last_state: player.state(),
            player,
            camera,
        }
    }

    /// Load the level, background and player animations named in `config`
    pub fn from_config(config: &GameConfig, viewport: (u32, u32)) -> Result<Self> {
        let mut assets = AssetManager::new(&config.assets.root);

        let player_config = &config.player;
        let frame_size = (player_config.sprite_size, player_config.sprite_size);
        let mut clips = Vec::with_capacity(player_config.animations.len());
        for source in &player_config.animations {
            let frames = assets
                .load_animation(&source.dir, source.frames, frame_size)
                .with_context(|| format!("Failed to load {:?} animation", source.kind))?;
            clips.push((source.kind, frames));
        }
        let set = Arc::new(AnimationSet::from_clips(clips)?);

        let map_path = config.map_path();
        let map = TileMapLoader::new(config.level.tile_scale)
            .load(&map_path, &mut assets)
            .with_context(|| format!("Failed to load level {}", map_path.display()))?;

        let sky = assets
            .load_image(&config.level.background)
            .context("Failed to load background")?;
        let background = Background::new(sky, viewport, config.level.parallax);

        let level = Level::new(&map, background);
        let (x, y) = player_config.spawn;
        let player = Character::new(
            Vec2::new(x, y),
            set,
            player_config.stats.clone(),
            player_config.frame_duration_ms,
        );

        info!(
            "World ready: {} solid tiles, {} images loaded",
            level.solid_rects().len(),
            assets.stats().image_count
        );

        Ok(Self::new(level, player, viewport))
    }

    /// Step the player by `dt_ms`, clamped to [`MAX_FRAME_MS`]
    pub fn update(&mut self, dt_ms: f32, intent: &Intent) {
        let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_MS);
        self.player.update(dt_ms, intent, self.level.solid_rects());

        let state = self.player.state();
        if state != self.last_state {
            let animation = self.player.animation();
            debug!(
                "Player {:?} -> {:?} ({:?} frame {})",
                self.last_state,
                state,
                animation.active(),
                animation.frame_index()
            );
            self.last_state = state;
        }
    }

    /// Draw one frame: background, tiles on screen, then entities by depth
    pub fn render(&mut self, display: &mut dyn Display) -> Result<()> {
        self.camera.center_on(&self.player.rect());
        let offset = self.camera.offset();

        let background = self.level.background();
        for position in background.placements(offset) {
            display.present(Sprite::new(background.image()), position);
        }

        let view = self.camera.view_rect();
        for tile in self.level.geometry().visible_tiles(&view) {
            display.present(
                Sprite::new(&tile.image),
                self.camera.world_to_screen(tile.rect.top_left()),
            );
        }

        self.camera.draw(&[&self.player], display);
        display.flip()
    }

    /// Follow a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width as f32, height as f32);
        self.level.background_mut().resize((width, height));
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}
