//! Domain types for Kalaha: pits, players, turn, status and the board.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{is_store_pit, PITS_PER_SIDE};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Player {
    PlayerOne,
    PlayerTwo,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
        }
    }

    pub fn turn(self) -> PlayerTurn {
        match self {
            Player::PlayerOne => PlayerTurn::PlayerOneTurn,
            Player::PlayerTwo => PlayerTurn::PlayerTwoTurn,
        }
    }

    /// Zero-based seat, used to index per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::PlayerOne => 0,
            Player::PlayerTwo => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::PlayerOne => "PLAYER_ONE",
            Player::PlayerTwo => "PLAYER_TWO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerTurn {
    PlayerOneTurn,
    PlayerTwoTurn,
}

impl PlayerTurn {
    pub fn player(self) -> Player {
        match self {
            PlayerTurn::PlayerOneTurn => Player::PlayerOne,
            PlayerTurn::PlayerTwoTurn => Player::PlayerTwo,
        }
    }

    pub fn next(self) -> PlayerTurn {
        self.player().opponent().turn()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerTurn::PlayerOneTurn => "PLAYER_ONE_TURN",
            PlayerTurn::PlayerTwoTurn => "PLAYER_TWO_TURN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Created,
    InProgress,
    Completed,
    CompletedDraw,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Completed | GameStatus::CompletedDraw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Created => "CREATED",
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::Completed => "COMPLETED",
            GameStatus::CompletedDraw => "COMPLETED_DRAW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitKind {
    Playing,
    Store,
}

/// A single pit on the ring. `pit_id` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pit {
    pub pit_id: usize,
    pub stones: u32,
}

impl Pit {
    pub fn new(pit_id: usize, stones: u32) -> Self {
        Self { pit_id, stones }
    }

    pub fn kind(&self) -> PitKind {
        if is_store_pit(self.pit_id) {
            PitKind::Store
        } else {
            PitKind::Playing
        }
    }

    pub fn is_store(&self) -> bool {
        self.kind() == PitKind::Store
    }

    pub fn is_empty(&self) -> bool {
        self.stones == 0
    }

    pub fn clear(&mut self) {
        self.stones = 0;
    }

    /// Drop a single stone into this pit.
    pub fn sow(&mut self) {
        self.stones += 1;
    }

    pub fn add_stones(&mut self, stones: u32) {
        self.stones += stones;
    }

    /// Empty the pit, returning what it held.
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.stones)
    }
}

impl fmt::Display for Pit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pit_id, self.stones)
    }
}

/// Upper bound on the stones a board may hold, so every pit and every side
/// total fits the signed 32-bit counts of the wire format.
pub const MAX_TOTAL_STONES: u64 = i32::MAX as u64;

/// Largest per-pit starting count whose board stays within
/// [`MAX_TOTAL_STONES`].
pub fn max_starting_stones(number_of_players: usize) -> u32 {
    let playing_pits = (PITS_PER_SIDE * number_of_players.max(1)) as u64;
    (MAX_TOTAL_STONES / playing_pits).min(u32::MAX as u64) as u32
}

/// A game in progress: the pit ring plus turn, status and winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub pits: Vec<Pit>,
    pub player_turn: Option<PlayerTurn>,
    pub game_status: GameStatus,
    pub winner: Option<Player>,
    pub number_of_players: usize,
}

impl Board {
    /// Build a fresh board: every seventh pit is an empty store, every other
    /// pit holds `stones`.
    pub fn new(stones: u32, number_of_players: usize) -> Self {
        let total = (PITS_PER_SIDE + 1) * number_of_players;
        let pits = (1..=total)
            .map(|pit_id| {
                if is_store_pit(pit_id) {
                    Pit::new(pit_id, 0)
                } else {
                    Pit::new(pit_id, stones)
                }
            })
            .collect();
        Self {
            pits,
            player_turn: None,
            game_status: GameStatus::Created,
            winner: None,
            number_of_players,
        }
    }

    /// Like [`Board::new`] but rejects zero stones, zero players and
    /// starting counts above [`max_starting_stones`].
    pub fn try_new(stones: u32, number_of_players: usize) -> Result<Self, GameError> {
        if stones == 0 {
            return Err(GameError::InvalidConfiguration(
                "pit stones can't be zero or negative.".into(),
            ));
        }
        if number_of_players == 0 {
            return Err(GameError::InvalidConfiguration(
                "number of players can't be zero".into(),
            ));
        }
        let max = max_starting_stones(number_of_players);
        if stones > max {
            return Err(GameError::InvalidConfiguration(format!(
                "pit stones can't be greater than {} for {} players.",
                max, number_of_players
            )));
        }
        Ok(Self::new(stones, number_of_players))
    }

    pub fn total_pits(&self) -> usize {
        self.pits.len()
    }

    pub fn pit(&self, pit_id: usize) -> Result<&Pit, GameError> {
        let total = self.total_pits();
        pit_id
            .checked_sub(1)
            .and_then(|i| self.pits.get(i))
            .ok_or(GameError::InvalidPit { pit: pit_id, total })
    }

    pub fn pit_mut(&mut self, pit_id: usize) -> Result<&mut Pit, GameError> {
        let total = self.total_pits();
        pit_id
            .checked_sub(1)
            .and_then(|i| self.pits.get_mut(i))
            .ok_or(GameError::InvalidPit { pit: pit_id, total })
    }

    pub fn total_stones(&self) -> u64 {
        self.pits.iter().map(|p| p.stones as u64).sum()
    }

    /// The seven pits (six playing pits + store) belonging to `player`.
    pub fn side(&self, player: Player) -> &[Pit] {
        let width = PITS_PER_SIDE + 1;
        let start = player.index() * width;
        let end = (start + width).min(self.pits.len());
        self.pits.get(start..end).unwrap_or(&[])
    }

    pub fn side_score(&self, player: Player) -> u64 {
        self.side(player).iter().map(|p| p.stones as u64).sum()
    }

    /// True when all six playing pits of `player` are empty.
    pub fn side_is_empty(&self, player: Player) -> bool {
        self.side(player)
            .iter()
            .filter(|p| !p.is_store())
            .all(Pit::is_empty)
    }

    pub fn is_terminal(&self) -> bool {
        self.game_status.is_terminal()
    }

    pub fn current_player(&self) -> Option<Player> {
        self.player_turn.map(PlayerTurn::player)
    }

    /// Compact `[1:6, 2:6, ...]` rendering of the pit ring.
    pub fn pits_string(&self) -> String {
        let parts: Vec<String> = self.pits.iter().map(Pit::to_string).collect();
        format!("[{}]", parts.join(", "))
    }
}
