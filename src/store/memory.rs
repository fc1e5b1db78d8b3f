use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{new_game_id, GameRepository, StoredGame};
use crate::error::StoreError;
use crate::games::kalaha::types::Board;

/// Process-local repository; contents are lost on restart.
#[derive(Default)]
pub struct MemoryRepository {
    games: RwLock<HashMap<String, Board>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameRepository for MemoryRepository {
    fn create(&self, board: Board) -> Result<StoredGame, StoreError> {
        let game = StoredGame {
            game_id: new_game_id(),
            board,
        };
        self.save(&game)
    }

    fn load(&self, game_id: &str) -> Result<StoredGame, StoreError> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games
            .get(game_id)
            .map(|board| StoredGame {
                game_id: game_id.to_string(),
                board: board.clone(),
            })
            .ok_or_else(|| StoreError::NotFound(game_id.to_string()))
    }

    fn save(&self, game: &StoredGame) -> Result<StoredGame, StoreError> {
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(game.game_id.clone(), game.board.clone());
        Ok(game.clone())
    }
}
