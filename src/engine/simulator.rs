//! Synchronous game playout: drives a board to completion with two bots.
//! Used by the arena and by invariant tests.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::MoveOutcome;
use crate::engine::plugin::SowingRules;
use crate::error::GameError;
use crate::games::kalaha::types::{Board, Player};

/// Upper bound on moves before a playout is abandoned.
pub const DEFAULT_MAX_MOVES: usize = 10_000;

/// A finished (or abandoned) playout.
pub struct Playout {
    pub board: Board,
    pub moves: Vec<MoveOutcome>,
    /// True when the move cap was hit before the game ended.
    pub truncated: bool,
}

/// Play one game. `seats[0]` moves for player one, `seats[1]` for player
/// two. Before the first move no side is fixed, so player one's bot opens
/// from its own pits.
pub fn play_game(
    rules: &dyn SowingRules,
    seats: [&dyn BotStrategy; 2],
    starting_stones: u32,
    seed: u64,
    max_moves: usize,
) -> Result<Playout, GameError> {
    let mut board = Board::try_new(starting_stones, rules.number_of_players())?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut moves = Vec::new();

    while !board.is_terminal() {
        if moves.len() >= max_moves {
            return Ok(Playout {
                board,
                moves,
                truncated: true,
            });
        }

        let mover = board.current_player().unwrap_or(Player::PlayerOne);
        let strategy = seats[mover.index()];
        let pit = if board.player_turn.is_none() {
            opening_pit(&board, rules, strategy, &mut rng)
        } else {
            strategy.choose_pit(&board, rules, &mut rng)
        };

        let Some(pit) = pit else {
            break;
        };
        moves.push(rules.apply_move(&mut board, pit)?);
    }

    Ok(Playout {
        board,
        moves,
        truncated: false,
    })
}

/// Restrict the unconstrained first move to player one's side.
fn opening_pit(
    board: &Board,
    rules: &dyn SowingRules,
    strategy: &dyn BotStrategy,
    rng: &mut StdRng,
) -> Option<usize> {
    let mut as_player_one = board.clone();
    as_player_one.player_turn = Some(Player::PlayerOne.turn());
    strategy.choose_pit(&as_player_one, rules, rng)
}
