//! Two-player sowing rules: move validation, stone distribution, capture,
//! turn handling and end-of-game scoring.

use crate::engine::models::{Capture, MoveOutcome};
use crate::engine::plugin::SowingRules;
use crate::error::GameError;

use super::board::{
    is_own_playing_pit, is_store_pit, next_pit, opposite_pit, owner_of, store_of, PITS_PER_SIDE,
    SOWING_RING, TOTAL_PITS,
};
use super::types::{Board, GameStatus, Player, MAX_TOTAL_STONES};

pub struct TwoPlayerSowing;

impl TwoPlayerSowing {
    const PLAYERS: usize = 2;

    /// The arithmetic in `board` assumes exactly fourteen pits and a stone
    /// count no pit can overflow.
    fn check_layout(board: &Board) -> Result<(), GameError> {
        if board.number_of_players != Self::PLAYERS || board.total_pits() != TOTAL_PITS {
            return Err(GameError::InvalidConfiguration(format!(
                "two-player rules cannot play a board with {} players and {} pits",
                board.number_of_players,
                board.total_pits()
            )));
        }
        let total = board.total_stones();
        if total > MAX_TOTAL_STONES {
            return Err(GameError::InvalidConfiguration(format!(
                "board holds {} stones, more than the {} allowed",
                total, MAX_TOTAL_STONES
            )));
        }
        Ok(())
    }

    fn check_move(board: &Board, pit_id: usize) -> Result<(), GameError> {
        let selected = board.pit(pit_id)?;

        if board.is_terminal() {
            return Err(GameError::GameCompleted);
        }
        if is_store_pit(pit_id) {
            return Err(GameError::SowFromStore(pit_id));
        }
        if let Some(mover) = board.current_player() {
            if owner_of(pit_id) != Some(mover) {
                return Err(GameError::NotYourTurn(pit_id));
            }
        }
        if selected.is_empty() {
            return Err(GameError::EmptyPit(pit_id));
        }
        Ok(())
    }

    /// Moves the game out of `Created` and fixes the mover on the first move.
    fn start_game_if_not_started(board: &mut Board, pit_id: usize) -> Player {
        if board.game_status == GameStatus::Created {
            board.game_status = GameStatus::InProgress;
        }
        match board.current_player() {
            Some(player) => player,
            None => {
                let player = if pit_id <= PITS_PER_SIDE {
                    Player::PlayerOne
                } else {
                    Player::PlayerTwo
                };
                board.player_turn = Some(player.turn());
                player
            }
        }
    }

    /// Lifts the selected pit and sows all but the final stone.
    /// Returns the stones lifted and the landing pit of the final stone.
    ///
    /// Whole laps around the ring are deposited in one pass, so a move
    /// touches each pit at most twice however many stones it carries.
    fn sow_all_but_last(
        board: &mut Board,
        pit_id: usize,
        mover: Player,
    ) -> Result<(u32, usize), GameError> {
        let lifted = board.pit_mut(pit_id)?.take();
        let before_last = lifted.saturating_sub(1);
        let ring = SOWING_RING as u32;

        let laps = before_last / ring;
        if laps > 0 {
            let skipped = store_of(mover.opponent());
            for pit in board.pits.iter_mut().filter(|p| p.pit_id != skipped) {
                pit.add_stones(laps);
            }
        }

        let mut current = pit_id;
        for _ in 0..before_last % ring {
            current = next_pit(current, mover);
            board.pit_mut(current)?.sow();
        }
        Ok((lifted, next_pit(current, mover)))
    }

    fn sow_last_stone(
        board: &mut Board,
        landing: usize,
        mover: Player,
    ) -> Result<Option<Capture>, GameError> {
        if is_store_pit(landing) {
            board.pit_mut(landing)?.sow();
            return Ok(None);
        }

        let opposite = opposite_pit(landing);
        let landing_empty = board.pit(landing)?.is_empty();
        let opposite_stones = board.pit(opposite)?.stones;

        if landing_empty && opposite_stones > 0 && is_own_playing_pit(landing, mover) {
            board.pit_mut(opposite)?.clear();
            // The final stone goes to the store along with the captured ones.
            board
                .pit_mut(store_of(mover))?
                .add_stones(opposite_stones + 1);
            return Ok(Some(Capture {
                landing_pit: landing,
                opposite_pit: opposite,
                stones: opposite_stones,
            }));
        }

        board.pit_mut(landing)?.sow();
        Ok(None)
    }

    fn close_if_side_empty(board: &mut Board) {
        if !board.side_is_empty(Player::PlayerOne) && !board.side_is_empty(Player::PlayerTwo) {
            return;
        }
        let one = board.side_score(Player::PlayerOne);
        let two = board.side_score(Player::PlayerTwo);
        if one == two {
            board.game_status = GameStatus::CompletedDraw;
            board.winner = None;
        } else {
            board.game_status = GameStatus::Completed;
            board.winner = Some(if one > two {
                Player::PlayerOne
            } else {
                Player::PlayerTwo
            });
        }
        tracing::debug!(
            player_one = one,
            player_two = two,
            status = board.game_status.as_str(),
            "game finished"
        );
    }
}

impl SowingRules for TwoPlayerSowing {
    fn rules_id(&self) -> &str {
        "kalaha-2p"
    }

    fn display_name(&self) -> &str {
        "Kalaha (two players)"
    }

    fn number_of_players(&self) -> usize {
        Self::PLAYERS
    }

    fn apply_move(&self, board: &mut Board, pit_id: usize) -> Result<MoveOutcome, GameError> {
        Self::check_layout(board)?;
        Self::check_move(board, pit_id)?;

        let mover = Self::start_game_if_not_started(board, pit_id);
        let (stones_lifted, last_pit) = Self::sow_all_but_last(board, pit_id, mover)?;
        let capture = Self::sow_last_stone(board, last_pit, mover)?;
        if let Some(c) = capture {
            tracing::debug!(
                pit = c.landing_pit,
                opposite = c.opposite_pit,
                stones = c.stones,
                "capture"
            );
        }

        let extra_turn = is_store_pit(last_pit);
        if !extra_turn {
            board.player_turn = Some(mover.opponent().turn());
        }

        Self::close_if_side_empty(board);

        Ok(MoveOutcome {
            mover,
            selected_pit: pit_id,
            stones_lifted,
            last_pit,
            capture,
            extra_turn,
            status: board.game_status,
        })
    }

    fn valid_moves(&self, board: &Board) -> Vec<usize> {
        if board.is_terminal() || Self::check_layout(board).is_err() {
            return Vec::new();
        }
        let mover = board.current_player();
        board
            .pits
            .iter()
            .filter(|p| !p.is_store() && !p.is_empty())
            .filter(|p| mover.map_or(true, |m| owner_of(p.pit_id) == Some(m)))
            .map(|p| p.pit_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::kalaha::types::{max_starting_stones, PlayerTurn};

    fn new_board() -> Board {
        let board = Board::new(6, 2);
        assert_eq!(board.game_status, GameStatus::Created);
        board
    }

    fn set(board: &mut Board, pit_id: usize, stones: u32) {
        board.pit_mut(pit_id).unwrap().stones = stones;
    }

    #[test]
    fn test_first_move_from_pit_two() {
        let mut board = new_board();
        let outcome = TwoPlayerSowing.apply_move(&mut board, 2).unwrap();

        assert_eq!(
            board.pits_string(),
            "[1:6, 2:0, 3:7, 4:7, 5:7, 6:7, 7:1, 8:7, 9:6, 10:6, 11:6, 12:6, 13:6, 14:0]"
        );
        // Sixth stone lands on pit 8, past the store.
        assert_eq!(outcome.last_pit, 8);
        assert_eq!(outcome.mover, Player::PlayerOne);
        assert!(!outcome.extra_turn);
        assert_eq!(board.game_status, GameStatus::InProgress);
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerTwoTurn));
    }

    #[test]
    fn test_sowing_from_store_rejected() {
        let mut board = new_board();
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 7),
            Err(GameError::SowFromStore(7))
        );
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 14),
            Err(GameError::SowFromStore(14))
        );

        board.game_status = GameStatus::InProgress;
        board.player_turn = Some(PlayerTurn::PlayerTwoTurn);
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 14),
            Err(GameError::SowFromStore(14))
        );
        assert_eq!(board, {
            let mut b = new_board();
            b.game_status = GameStatus::InProgress;
            b.player_turn = Some(PlayerTurn::PlayerTwoTurn);
            b
        });
    }

    #[test]
    fn test_not_your_turn() {
        let mut board = new_board();
        board.player_turn = Some(PlayerTurn::PlayerOneTurn);
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 9),
            Err(GameError::NotYourTurn(9))
        );

        board.player_turn = Some(PlayerTurn::PlayerTwoTurn);
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 1),
            Err(GameError::NotYourTurn(1))
        );
    }

    #[test]
    fn test_empty_pit_rejected() {
        let mut board = new_board();
        set(&mut board, 2, 0);
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 2),
            Err(GameError::EmptyPit(2))
        );
        assert_eq!(board.game_status, GameStatus::Created);
    }

    #[test]
    fn test_completed_game_rejects_moves_unchanged() {
        let mut board = new_board();
        board.game_status = GameStatus::Completed;
        let before = board.clone();
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 1),
            Err(GameError::GameCompleted)
        );
        assert_eq!(board, before);

        board.game_status = GameStatus::CompletedDraw;
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 9),
            Err(GameError::GameCompleted)
        );
    }

    #[test]
    fn test_invalid_pit_index() {
        let mut board = new_board();
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 0),
            Err(GameError::InvalidPit { pit: 0, total: 14 })
        );
        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 15),
            Err(GameError::InvalidPit { pit: 15, total: 14 })
        );
    }

    #[test]
    fn test_unsupported_board_layout() {
        let mut board = Board::new(6, 3);
        assert!(matches!(
            TwoPlayerSowing.apply_move(&mut board, 1),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert!(TwoPlayerSowing.valid_moves(&board).is_empty());
    }

    #[test]
    fn test_last_stone_in_own_store_keeps_turn() {
        let mut board = new_board();
        let outcome = TwoPlayerSowing.apply_move(&mut board, 1).unwrap();
        assert!(outcome.extra_turn);
        assert_eq!(board.game_status, GameStatus::InProgress);
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerOneTurn));

        let mut board = new_board();
        let outcome = TwoPlayerSowing.apply_move(&mut board, 8).unwrap();
        assert_eq!(outcome.last_pit, 14);
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerTwoTurn));
    }

    #[test]
    fn test_capture_opposite_pit() {
        let mut board = new_board();
        set(&mut board, 1, 1);
        set(&mut board, 2, 0);
        assert_eq!(board.pit(7).unwrap().stones, 0);
        assert_eq!(board.pit(12).unwrap().stones, 6);

        let outcome = TwoPlayerSowing.apply_move(&mut board, 1).unwrap();

        assert_eq!(
            outcome.capture,
            Some(Capture {
                landing_pit: 2,
                opposite_pit: 12,
                stones: 6
            })
        );
        assert_eq!(board.pit(7).unwrap().stones, 6 + 1);
        assert_eq!(board.pit(12).unwrap().stones, 0);
        assert_eq!(board.pit(1).unwrap().stones, 0);
        assert_eq!(board.pit(2).unwrap().stones, 0);
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerTwoTurn));
    }

    #[test]
    fn test_no_capture_on_opponent_side_or_empty_opposite() {
        // Landing in an empty pit on the opponent's side is a plain deposit.
        let mut board = new_board();
        set(&mut board, 6, 3);
        set(&mut board, 9, 0);
        TwoPlayerSowing.apply_move(&mut board, 6).unwrap();
        assert_eq!(board.pit(9).unwrap().stones, 1);
        assert_eq!(board.pit(5).unwrap().stones, 6);

        // Empty own pit but nothing opposite: plain deposit too.
        let mut board = new_board();
        set(&mut board, 1, 1);
        set(&mut board, 2, 0);
        set(&mut board, 12, 0);
        let outcome = TwoPlayerSowing.apply_move(&mut board, 1).unwrap();
        assert!(outcome.capture.is_none());
        assert_eq!(board.pit(2).unwrap().stones, 1);
        assert_eq!(board.pit(7).unwrap().stones, 0);
    }

    #[test]
    fn test_announces_winner() {
        let mut board = new_board();
        for pit_id in 1..=5 {
            set(&mut board, pit_id, 0);
        }
        set(&mut board, 6, 4);
        set(&mut board, 7, 25);
        set(&mut board, 14, 10);
        assert!(board.winner.is_none());

        let outcome = TwoPlayerSowing.apply_move(&mut board, 6).unwrap();

        assert!(outcome.game_over());
        assert_eq!(board.winner, Some(Player::PlayerTwo));
        assert_eq!(board.game_status, GameStatus::Completed);
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerTwoTurn));
        assert_eq!(board.side_score(Player::PlayerOne), 26);
        assert_eq!(board.side_score(Player::PlayerTwo), 49);

        assert_eq!(
            TwoPlayerSowing.apply_move(&mut board, 8),
            Err(GameError::GameCompleted)
        );
    }

    #[test]
    fn test_draw() {
        let mut board = new_board();
        for pit_id in 1..=5 {
            set(&mut board, pit_id, 0);
        }
        set(&mut board, 6, 1);
        set(&mut board, 7, 35);

        let outcome = TwoPlayerSowing.apply_move(&mut board, 6).unwrap();

        assert!(outcome.extra_turn);
        assert_eq!(board.game_status, GameStatus::CompletedDraw);
        assert!(board.winner.is_none());
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerOneTurn));
    }

    #[test]
    fn test_long_sow_wraps_and_skips_opponent_store() {
        let mut board = new_board();
        set(&mut board, 1, 13);
        let total = board.total_stones();

        let outcome = TwoPlayerSowing.apply_move(&mut board, 1).unwrap();

        // Wraps past pit 14 back onto the emptied pit 1 and captures pit 13.
        assert_eq!(outcome.last_pit, 1);
        assert_eq!(outcome.capture.map(|c| c.stones), Some(7));
        assert_eq!(
            board.pits_string(),
            "[1:0, 2:7, 3:7, 4:7, 5:7, 6:7, 7:9, 8:7, 9:7, 10:7, 11:7, 12:7, 13:0, 14:0]"
        );
        assert_eq!(board.total_stones(), total);
    }

    #[test]
    fn test_full_lap_conserves_stones() {
        let mut board = new_board();
        set(&mut board, 1, 14);
        let total = board.total_stones();

        TwoPlayerSowing.apply_move(&mut board, 1).unwrap();

        assert_eq!(
            board.pits_string(),
            "[1:1, 2:8, 3:7, 4:7, 5:7, 6:7, 7:1, 8:7, 9:7, 10:7, 11:7, 12:7, 13:7, 14:0]"
        );
        assert_eq!(board.total_stones(), total);
    }

    /// Stone-by-stone distribution, for comparison with the lap shortcut.
    fn sow_one_at_a_time(board: &mut Board, pit_id: usize, mover: Player) -> usize {
        let mut remaining = board.pit_mut(pit_id).unwrap().take();
        let mut current = pit_id;
        while remaining > 1 {
            current = next_pit(current, mover);
            board.pit_mut(current).unwrap().sow();
            remaining -= 1;
        }
        next_pit(current, mover)
    }

    #[test]
    fn test_lap_distribution_matches_stepwise() {
        let starts = [
            (1, Player::PlayerOne),
            (6, Player::PlayerOne),
            (8, Player::PlayerTwo),
            (13, Player::PlayerTwo),
        ];
        for (pit_id, mover) in starts {
            for stones in 1..=60 {
                let mut start = new_board();
                set(&mut start, pit_id, stones);

                let mut fast = start.clone();
                let (lifted, landing) =
                    TwoPlayerSowing::sow_all_but_last(&mut fast, pit_id, mover).unwrap();

                let mut slow = start.clone();
                let expected_landing = sow_one_at_a_time(&mut slow, pit_id, mover);

                assert_eq!(lifted, stones);
                assert_eq!(landing, expected_landing, "pit {} stones {}", pit_id, stones);
                assert_eq!(fast, slow, "pit {} stones {}", pit_id, stones);
            }
        }
    }

    #[test]
    fn test_largest_starting_count() {
        let max = max_starting_stones(2);
        let mut board = Board::try_new(max, 2).unwrap();

        let outcome = TwoPlayerSowing.apply_move(&mut board, 1).unwrap();

        assert_eq!(outcome.stones_lifted, max);
        assert_eq!(outcome.last_pit, 11);
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerTwoTurn));
        assert_eq!(
            board.pits_string(),
            "[1:13765920, 2:192722891, 3:192722891, 4:192722891, 5:192722891, \
             6:192722891, 7:13765921, 8:192722891, 9:192722891, 10:192722891, \
             11:192722891, 12:192722890, 13:192722890, 14:0]"
        );
        assert_eq!(board.total_stones(), 12 * max as u64);
        assert!(board.pits.iter().all(|p| p.stones <= i32::MAX as u32));
    }

    #[test]
    fn test_game_end_at_largest_count() {
        let max = max_starting_stones(2);
        let mut board = Board::try_new(max, 2).unwrap();
        for pit_id in 1..=5 {
            set(&mut board, pit_id, 0);
        }
        set(&mut board, 6, 1);
        set(&mut board, 7, 6 * max - 1);
        assert_eq!(board.total_stones(), 12 * max as u64);

        TwoPlayerSowing.apply_move(&mut board, 6).unwrap();

        assert_eq!(board.game_status, GameStatus::CompletedDraw);
        assert_eq!(board.side_score(Player::PlayerOne), 6 * max as u64);
        assert_eq!(board.side_score(Player::PlayerTwo), 6 * max as u64);
    }

    #[test]
    fn test_oversized_board_rejected() {
        let mut board = new_board();
        set(&mut board, 1, u32::MAX);
        let before = board.clone();
        assert!(matches!(
            TwoPlayerSowing.apply_move(&mut board, 1),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert_eq!(board, before);
        assert!(TwoPlayerSowing.valid_moves(&board).is_empty());
    }

    #[test]
    fn test_valid_moves() {
        let mut board = new_board();
        assert_eq!(
            TwoPlayerSowing.valid_moves(&board),
            vec![1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13]
        );

        TwoPlayerSowing.apply_move(&mut board, 2).unwrap();
        assert_eq!(
            TwoPlayerSowing.valid_moves(&board),
            vec![8, 9, 10, 11, 12, 13]
        );

        board.game_status = GameStatus::Completed;
        assert!(TwoPlayerSowing.valid_moves(&board).is_empty());
    }

    #[test]
    fn test_consuming_sow() {
        let board = TwoPlayerSowing.sow(new_board(), 9).unwrap();
        assert_eq!(board.player_turn, Some(PlayerTurn::PlayerOneTurn));
        assert_eq!(board.pit(14).unwrap().stones, 1);
        assert!(TwoPlayerSowing.sow(board, 9).is_err());
    }
}
