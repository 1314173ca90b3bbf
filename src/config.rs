// Game configuration loaded from a RON file
//
// Every field has a default, so a partial file (or none at all) works.

use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::game::characters::animation::DEFAULT_FRAME_DURATION_MS;
use crate::game::characters::{AnimationKind, CharacterStats};
use crate::game::level::map::DEFAULT_TILE_SCALE;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV_VAR: &str = "KURO_RUN_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.ron";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub level: LevelConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frame rate cap; 0 disables it
    pub target_fps: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory every other asset path is relative to
    pub root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub map: PathBuf,
    pub background: PathBuf,
    /// Share of horizontal camera movement the background follows
    pub parallax: f32,
    pub tile_scale: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Top-left corner of the first frame
    pub spawn: (f32, f32),
    /// Every animation frame is scaled to this square size
    pub sprite_size: u32,
    pub frame_duration_ms: f32,
    pub animations: Vec<AnimationSource>,
    pub stats: CharacterStats,
}

/// Where one animation's frames live: `<dir>/0.png .. <dir>/<frames - 1>.png`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationSource {
    pub kind: AnimationKind,
    pub dir: PathBuf,
    pub frames: usize,
}

impl AnimationSource {
    fn kuro(kind: AnimationKind, name: &str, frames: usize) -> Self {
        Self {
            kind,
            dir: Path::new("MainCharacters/Kuro").join(name),
            frames,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Kuro Run".to_string(),
            width: 1200,
            height: 800,
            target_fps: 60,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            map: PathBuf::from("maps/level.ron"),
            background: PathBuf::from("Background/sky.png"),
            parallax: 0.0,
            tile_scale: DEFAULT_TILE_SCALE,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: (700.0, 1700.0),
            sprite_size: 115,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            animations: vec![
                AnimationSource::kuro(AnimationKind::Idle, "Idle", 4),
                AnimationSource::kuro(AnimationKind::Run, "Run", 6),
                AnimationSource::kuro(AnimationKind::Jump, "Jump", 2),
                AnimationSource::kuro(AnimationKind::Attack, "Attack", 4),
            ],
            stats: CharacterStats::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config document
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Read and parse the config file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&source)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config = Self::load(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Config path from the environment, or the default file name
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Level file location under the asset root
    pub fn map_path(&self) -> PathBuf {
        self.assets.root.join(&self.level.map)
    }
}
