//! Persistence for boards keyed by game id, plus the game cache.

pub mod cache;
pub mod file;
pub mod memory;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::games::kalaha::types::Board;

pub use cache::GameCache;
pub use file::FileRepository;
pub use memory::MemoryRepository;

/// A board together with the id it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGame {
    pub game_id: String,
    #[serde(flatten)]
    pub board: Board,
}

/// Create / load / save games by id. Saving overwrites; last writer wins.
pub trait GameRepository: Send + Sync {
    /// Store a new board under a freshly generated id.
    fn create(&self, board: Board) -> Result<StoredGame, StoreError>;

    fn load(&self, game_id: &str) -> Result<StoredGame, StoreError>;

    fn save(&self, game: &StoredGame) -> Result<StoredGame, StoreError>;
}

/// 24 lowercase hex characters.
pub fn new_game_id() -> String {
    let bytes: [u8; 12] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
