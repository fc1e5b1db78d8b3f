//! Kalaha: six playing pits and one store per player, stones sown
//! counter-clockwise, captures into the mover's store.

pub mod board;
pub mod sowing;
pub mod types;

pub use sowing::TwoPlayerSowing;
pub use types::{Board, GameStatus, Pit, PitKind, Player, PlayerTurn};
