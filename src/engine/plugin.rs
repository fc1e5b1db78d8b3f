//! SowingRules trait: the interface every rule set implements.

use crate::engine::models::MoveOutcome;
use crate::error::GameError;
use crate::games::kalaha::types::Board;

/// A rule set that validates and applies moves on a [`Board`].
///
/// Implementations are stateless: all game state lives on the board, which
/// the caller owns and hands over by exclusive reference for one move.
pub trait SowingRules: Send + Sync {
    fn rules_id(&self) -> &str;
    fn display_name(&self) -> &str;

    /// Number of players this rule set is written for.
    fn number_of_players(&self) -> usize;

    /// Validate the move and, if legal, apply it to `board` in place.
    /// On error the board is left untouched.
    fn apply_move(&self, board: &mut Board, pit_id: usize) -> Result<MoveOutcome, GameError>;

    /// Pits the current mover may legally select.
    fn valid_moves(&self, board: &Board) -> Vec<usize>;

    /// Consuming form of [`SowingRules::apply_move`].
    fn sow(&self, mut board: Board, pit_id: usize) -> Result<Board, GameError> {
        self.apply_move(&mut board, pit_id)?;
        Ok(board)
    }
}
