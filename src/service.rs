//! Game service: ties the repository, the cache and the sowing rules
//! together behind create / load / update / sow.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ServiceError;
use crate::games::kalaha::types::Board;
use crate::games::RulesRegistry;
use crate::store::{GameCache, GameRepository, StoredGame};

pub struct GameService {
    repository: Arc<dyn GameRepository>,
    cache: Mutex<GameCache>,
    registry: RulesRegistry,
    /// One lock per game with a move in flight, held across load-sow-save
    /// so two moves on the same game never interleave. Entries go away once
    /// nobody holds or waits on them.
    game_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl GameService {
    pub fn new(repository: Arc<dyn GameRepository>, cache_capacity: usize) -> Self {
        Self {
            repository,
            cache: Mutex::new(GameCache::new(cache_capacity)),
            registry: RulesRegistry::new(),
            game_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &RulesRegistry {
        &self.registry
    }

    pub fn create_game(
        &self,
        stones: u32,
        number_of_players: usize,
    ) -> Result<StoredGame, ServiceError> {
        let board = Board::try_new(stones, number_of_players)?;
        let game = self.repository.create(board)?;
        tracing::info!(
            game_id = %game.game_id,
            stones,
            number_of_players,
            "created game"
        );
        Ok(game)
    }

    /// Cache first, then the repository. Misses are cached.
    pub fn load_game(&self, game_id: &str) -> Result<StoredGame, ServiceError> {
        if let Some(board) = self.lock_cache().get(game_id) {
            tracing::debug!(game_id, "cache hit");
            return Ok(StoredGame {
                game_id: game_id.to_string(),
                board: board.clone(),
            });
        }
        let game = self.repository.load(game_id)?;
        self.lock_cache().put(game_id, game.board.clone());
        Ok(game)
    }

    /// Persist `game`. Finished games are dropped from the cache, all
    /// others are refreshed in it.
    pub fn update_game(&self, game: StoredGame) -> Result<StoredGame, ServiceError> {
        let saved = self.repository.save(&game)?;
        let mut cache = self.lock_cache();
        if saved.board.is_terminal() {
            cache.evict(&saved.game_id);
        } else {
            cache.put(&saved.game_id, saved.board.clone());
        }
        Ok(saved)
    }

    /// Load the game, apply the move with the rules for its player count
    /// and save the result. A rejected move leaves the stored game as it was.
    /// Moves on different games run concurrently.
    pub fn sow(&self, game_id: &str, pit_id: usize) -> Result<StoredGame, ServiceError> {
        let lock = self.game_lock(game_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.sow_exclusive(game_id, pit_id)
        };
        self.release_game_lock(game_id, lock);
        result
    }

    fn sow_exclusive(&self, game_id: &str, pit_id: usize) -> Result<StoredGame, ServiceError> {
        let mut game = self.load_game(game_id)?;
        let rules = self.registry.rules_for(game.board.number_of_players)?;
        let outcome = rules.apply_move(&mut game.board, pit_id)?;

        tracing::info!(
            game_id,
            pit = pit_id,
            mover = outcome.mover.as_str(),
            last_pit = outcome.last_pit,
            captured = outcome.capture.map(|c| c.stones).unwrap_or(0),
            extra_turn = outcome.extra_turn,
            status = outcome.status.as_str(),
            "sowed"
        );

        self.update_game(game)
    }

    fn game_lock(&self, game_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.lock_game_locks();
        Arc::clone(locks.entry(game_id.to_string()).or_default())
    }

    /// Drop the map entry when only the map and `lock` still refer to it.
    /// New holders can only appear through the map, so this is race free.
    fn release_game_lock(&self, game_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.lock_game_locks();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(game_id);
        }
    }

    fn lock_game_locks(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        self.game_locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_cache(&self) -> MutexGuard<'_, GameCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn cached(&self, game_id: &str) -> Option<Board> {
        self.lock_cache().get(game_id).cloned()
    }
}
