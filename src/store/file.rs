use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{new_game_id, GameRepository, StoredGame};
use crate::error::StoreError;
use crate::games::kalaha::types::Board;

/// One pretty-printed JSON document per game under `dir`.
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        tracing::info!(dir = %dir.display(), "opened file game repository");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids never contain path separators; anything else cannot exist here.
    fn path_for(&self, game_id: &str) -> Option<PathBuf> {
        let valid = !game_id.is_empty()
            && game_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{}.json", game_id)))
    }
}

impl GameRepository for FileRepository {
    fn create(&self, board: Board) -> Result<StoredGame, StoreError> {
        let game = StoredGame {
            game_id: new_game_id(),
            board,
        };
        self.save(&game)
    }

    fn load(&self, game_id: &str) -> Result<StoredGame, StoreError> {
        let path = self
            .path_for(game_id)
            .ok_or_else(|| StoreError::NotFound(game_id.to_string()))?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(game_id.to_string()))
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Json { path, source })
    }

    fn save(&self, game: &StoredGame) -> Result<StoredGame, StoreError> {
        let path = self
            .path_for(&game.game_id)
            .ok_or_else(|| StoreError::NotFound(game.game_id.clone()))?;
        let json = serde_json::to_string_pretty(game).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        // Readers never see a partially written document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(game.clone())
    }
}
