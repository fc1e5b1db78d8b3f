//! Server configuration, loaded from TOML at startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::games::kalaha::types::max_starting_stones;

/// Top-level TOML file structure. Every section is optional.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct KalahaConfig {
    pub server: ServerConfig,
    pub game: GameDefaults,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 50051 }
    }
}

/// Values used when a create-game request leaves a field out, plus the
/// upper bound on requested players.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GameDefaults {
    pub default_stones: u32,
    pub default_players: usize,
    pub max_players: usize,
}

impl Default for GameDefaults {
    fn default() -> Self {
        Self {
            default_stones: 6,
            default_players: 2,
            max_players: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub cache_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            data_dir: PathBuf::from("data/games"),
            cache_capacity: 256,
        }
    }
}

impl KalahaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;
        if game.default_stones == 0 {
            return Err(ConfigError::Validation(
                "game.default_stones must be > 0".into(),
            ));
        }
        if game.max_players == 0 {
            return Err(ConfigError::Validation(
                "game.max_players must be > 0".into(),
            ));
        }
        if !(1..=game.max_players).contains(&game.default_players) {
            return Err(ConfigError::Validation(format!(
                "game.default_players must be within 1..={}, got {}",
                game.max_players, game.default_players
            )));
        }
        let max_stones = max_starting_stones(game.default_players);
        if game.default_stones > max_stones {
            return Err(ConfigError::Validation(format!(
                "game.default_stones must be <= {} for {} players, got {}",
                max_stones, game.default_players, game.default_stones
            )));
        }
        if self.store.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "store.cache_capacity must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Parse and validate a config document.
pub fn parse_config(content: &str) -> Result<KalahaConfig, ConfigError> {
    let config: KalahaConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<KalahaConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Try well-known paths, falling back to built-in defaults.
pub fn load_default_config() -> KalahaConfig {
    let candidates = ["kalaha.toml", "../kalaha.toml", "/etc/kalaha/kalaha.toml"];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), "loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load config");
                }
            }
        }
    }
    tracing::info!("no kalaha.toml found, using built-in defaults");
    KalahaConfig::default()
}
