//! Engine result types shared by the rules, simulator and arena.

use serde::{Deserialize, Serialize};

use crate::games::kalaha::types::{GameStatus, Player};

/// Stones seized from the pit opposite an empty landing pit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    /// Own-side pit the final stone landed in (left empty).
    pub landing_pit: usize,
    pub opposite_pit: usize,
    /// Stones taken from the opposite pit, not counting the final stone.
    pub stones: u32,
}

/// What happened during one accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub mover: Player,
    pub selected_pit: usize,
    pub stones_lifted: u32,
    pub last_pit: usize,
    #[serde(default)]
    pub capture: Option<Capture>,
    /// The final stone landed in a store, so the mover plays again.
    pub extra_turn: bool,
    /// Status after the move; terminal when this move ended the game.
    pub status: GameStatus,
}

impl MoveOutcome {
    pub fn game_over(&self) -> bool {
        self.status.is_terminal()
    }
}
