//! Error types for the engine, the store, the service layer and config loading.

use std::path::PathBuf;

/// Rule violations and bad board setups reported by the board model and the
/// sowing engine. None of these leave a board partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("{0}")]
    InvalidConfiguration(String),

    #[error("Invalid pitIndex:{pit} has given! (valid range 1..={total})")]
    InvalidPit { pit: usize, total: usize },

    #[error("sowing stones from larger pit {0} is not allowed")]
    SowFromStore(usize),

    #[error("It's not your turn, please wait until the opponent finish their turn (pit {0})")]
    NotYourTurn(usize),

    #[error("can't select empty pit {0} for sowing")]
    EmptyPit(usize),

    #[error("Sowing not allowed on completed game.")]
    GameCompleted,
}

impl GameError {
    /// Stable name of the error kind, surfaced to transport callers.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::InvalidConfiguration(_) => "InvalidConfiguration",
            GameError::InvalidPit { .. } => "InvalidPit",
            GameError::SowFromStore(_) => "SowFromStore",
            GameError::NotYourTurn(_) => "NotYourTurn",
            GameError::EmptyPit(_) => "EmptyPit",
            GameError::GameCompleted => "GameCompleted",
        }
    }
}

/// Failures of a [`crate::store::GameRepository`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Game not found with gameId: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "GameNotFound",
            StoreError::Io { .. } => "StoreIo",
            StoreError::Json { .. } => "StoreJson",
        }
    }
}

/// Errors returned by [`crate::service::GameService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Game(e) => e.kind(),
            ServiceError::Store(e) => e.kind(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_display() {
        assert_eq!(
            GameError::GameCompleted.to_string(),
            "Sowing not allowed on completed game."
        );
        assert_eq!(
            GameError::InvalidPit { pit: 15, total: 14 }.to_string(),
            "Invalid pitIndex:15 has given! (valid range 1..=14)"
        );
    }

    #[test]
    fn test_service_error_kind_passes_through() {
        let err: ServiceError = GameError::EmptyPit(3).into();
        assert_eq!(err.kind(), "EmptyPit");

        let err: ServiceError = StoreError::NotFound("abc".into()).into();
        assert_eq!(err.kind(), "GameNotFound");
        assert_eq!(err.to_string(), "Game not found with gameId: abc");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("default_stones must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: default_stones must be > 0"
        );
    }
}
