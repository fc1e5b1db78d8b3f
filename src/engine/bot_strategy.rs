//! Bot strategy trait and implementations.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::engine::plugin::SowingRules;
use crate::games::kalaha::board::store_of;
use crate::games::kalaha::types::Board;

/// A bot strategy picks a pit for whoever is to move on `board`.
/// Returns None when there is no legal move.
pub trait BotStrategy: Send + Sync {
    fn choose_pit(
        &self,
        board: &Board,
        rules: &dyn SowingRules,
        rng: &mut dyn RngCore,
    ) -> Option<usize>;
}

/// Picks a uniformly random legal pit.
pub struct RandomStrategy;

impl BotStrategy for RandomStrategy {
    fn choose_pit(
        &self,
        board: &Board,
        rules: &dyn SowingRules,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        rules.valid_moves(board).choose(rng).copied()
    }
}

/// One-ply lookahead: maximise stones banked this move, then prefer moves
/// that earn another turn. Ties are broken at random.
pub struct GreedyStrategy;

impl BotStrategy for GreedyStrategy {
    fn choose_pit(
        &self,
        board: &Board,
        rules: &dyn SowingRules,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let mut best: Vec<usize> = Vec::new();
        let mut best_key = (0u32, false);

        for pit in rules.valid_moves(board) {
            let mut next = board.clone();
            let Ok(outcome) = rules.apply_move(&mut next, pit) else {
                continue;
            };
            let store = store_of(outcome.mover);
            let before = board.pit(store).map(|p| p.stones).unwrap_or(0);
            let after = next.pit(store).map(|p| p.stones).unwrap_or(0);
            let key = (after.saturating_sub(before), outcome.extra_turn);

            if best.is_empty() || key > best_key {
                best_key = key;
                best.clear();
                best.push(pit);
            } else if key == best_key {
                best.push(pit);
            }
        }

        best.choose(rng).copied()
    }
}

/// Build a strategy from its CLI name.
pub fn strategy_from_name(name: &str) -> Option<Box<dyn BotStrategy>> {
    match name {
        "random" => Some(Box::new(RandomStrategy)),
        "greedy" => Some(Box::new(GreedyStrategy)),
        _ => None,
    }
}
