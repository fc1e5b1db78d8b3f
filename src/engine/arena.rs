//! Bot-vs-bot arena runner.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::plugin::SowingRules;
use crate::engine::simulator::{play_game, DEFAULT_MAX_MOVES};
use crate::error::GameError;
use crate::games::kalaha::types::Player;

/// z for a two-sided 95% interval.
const Z_95: f64 = 1.96;

/// What one strategy did across the finished games of an arena run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyTally {
    pub wins: usize,
    /// Stones on the strategy's side (pits and store) when each game ended.
    pub side_totals: Vec<u64>,
    pub captures: usize,
    pub captured_stones: u64,
    pub extra_turns: usize,
}

impl StrategyTally {
    pub fn games(&self) -> usize {
        self.side_totals.len()
    }

    pub fn mean_side_total(&self) -> f64 {
        mean_and_stddev(&self.side_totals).0
    }

    pub fn side_total_stddev(&self) -> f64 {
        mean_and_stddev(&self.side_totals).1
    }

    fn per_game(&self, count: usize) -> f64 {
        count as f64 / self.games().max(1) as f64
    }
}

/// Aggregated results from an arena run.
pub struct ArenaResult {
    pub num_games: usize,
    pub draws: usize,
    /// Games cut off by the move limit. They count toward nothing else.
    pub truncated: usize,
    pub total_moves: usize,
    pub game_durations_ms: Vec<f64>,
    pub tallies: BTreeMap<String, StrategyTally>,
}

impl ArenaResult {
    pub fn tally(&self, name: &str) -> Option<&StrategyTally> {
        self.tallies.get(name)
    }

    pub fn win_rate(&self, name: &str) -> f64 {
        let wins = self.tally(name).map_or(0, |t| t.wins);
        wins as f64 / self.num_games.max(1) as f64
    }

    pub fn win_rate_interval(&self, name: &str) -> (f64, f64) {
        wilson_interval(self.tally(name).map_or(0, |t| t.wins), self.num_games)
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        for (name, tally) in &self.tallies {
            let (low, high) = self.win_rate_interval(name);
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]  side={:5.1} +/- {:4.1}",
                name,
                tally.wins,
                self.win_rate(name) * 100.0,
                low * 100.0,
                high * 100.0,
                tally.mean_side_total(),
                tally.side_total_stddev(),
            ));
            lines.push(format!(
                "  {:>12}  {:.2} captures/game ({:.1} stones), {:.2} extra turns/game",
                "",
                tally.per_game(tally.captures),
                tally.captured_stones as f64 / tally.games().max(1) as f64,
                tally.per_game(tally.extra_turns),
            ));
        }
        lines.push(format!("  {:>12}: {}", "Draws", self.draws));
        if self.truncated > 0 {
            lines.push(format!("  {:>12}: {}", "Truncated", self.truncated));
        }
        if !self.game_durations_ms.is_empty() {
            let played = self.game_durations_ms.len() as f64;
            lines.push(format!(
                "  Avg game: {:.2}ms, {:.1} moves",
                self.game_durations_ms.iter().sum::<f64>() / played,
                self.total_moves as f64 / played,
            ));
        }
        lines.join("\n")
    }
}

/// Wilson score interval for `wins` out of `games` at 95%, clamped to [0, 1].
pub fn wilson_interval(wins: usize, games: usize) -> (f64, f64) {
    if games == 0 {
        return (0.0, 0.0);
    }
    let n = games as f64;
    let p = wins as f64 / n;
    let z2 = Z_95 * Z_95;
    let scale = 1.0 + z2 / n;
    let centre = (p + z2 / (2.0 * n)) / scale;
    let spread = Z_95 * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / scale;
    ((centre - spread).max(0.0), (centre + spread).min(1.0))
}

/// Mean and sample standard deviation. Fewer than two values have no spread.
pub fn mean_and_stddev(values: &[u64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let squares: f64 = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
    (mean, (squares / (n - 1.0)).sqrt())
}

/// Outcome of a single arena game, indexed by seat.
struct GameRecord {
    seats: [String; 2],
    side_totals: [u64; 2],
    captures: [usize; 2],
    captured_stones: [u64; 2],
    extra_turns: [usize; 2],
    winner: Option<Player>,
    truncated: bool,
    moves: usize,
    elapsed_ms: f64,
}

/// Run `num_games` between two named strategies and return aggregated stats.
///
/// Games run in parallel; game `i` uses seed `base_seed + i`, so results are
/// reproducible. With `alternate_seats` the strategies swap sides every game.
pub fn run_arena(
    rules: &dyn SowingRules,
    strategies: &[(String, Box<dyn BotStrategy>); 2],
    num_games: usize,
    base_seed: u64,
    starting_stones: u32,
    alternate_seats: bool,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<ArenaResult, GameError> {
    let completed = std::sync::atomic::AtomicUsize::new(0);

    let records: Vec<GameRecord> = (0..num_games)
        .into_par_iter()
        .map(|game_idx| -> Result<GameRecord, GameError> {
            let (first, second) = if alternate_seats && game_idx % 2 == 1 {
                (&strategies[1], &strategies[0])
            } else {
                (&strategies[0], &strategies[1])
            };

            let t0 = Instant::now();
            let playout = play_game(
                rules,
                [first.1.as_ref(), second.1.as_ref()],
                starting_stones,
                base_seed + game_idx as u64,
                DEFAULT_MAX_MOVES,
            )?;
            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

            let done = completed.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
            if let Some(cb) = progress_callback {
                cb(done, num_games);
            }

            let mut captures = [0; 2];
            let mut captured_stones = [0; 2];
            let mut extra_turns = [0; 2];
            for outcome in &playout.moves {
                let seat = outcome.mover.index();
                if let Some(capture) = outcome.capture {
                    captures[seat] += 1;
                    captured_stones[seat] += capture.stones as u64;
                }
                if outcome.extra_turn {
                    extra_turns[seat] += 1;
                }
            }

            Ok(GameRecord {
                seats: [first.0.clone(), second.0.clone()],
                side_totals: [
                    playout.board.side_score(Player::PlayerOne),
                    playout.board.side_score(Player::PlayerTwo),
                ],
                captures,
                captured_stones,
                extra_turns,
                winner: playout.board.winner,
                truncated: playout.truncated,
                moves: playout.moves.len(),
                elapsed_ms,
            })
        })
        .collect::<Result<_, _>>()?;

    let mut result = ArenaResult {
        num_games,
        draws: 0,
        truncated: 0,
        total_moves: 0,
        game_durations_ms: Vec::with_capacity(num_games),
        tallies: strategies
            .iter()
            .map(|(name, _)| (name.clone(), StrategyTally::default()))
            .collect(),
    };

    for record in records {
        result.game_durations_ms.push(record.elapsed_ms);
        result.total_moves += record.moves;
        if record.truncated {
            result.truncated += 1;
            continue;
        }
        for (seat, name) in record.seats.iter().enumerate() {
            if let Some(tally) = result.tallies.get_mut(name) {
                tally.side_totals.push(record.side_totals[seat]);
                tally.captures += record.captures[seat];
                tally.captured_stones += record.captured_stones[seat];
                tally.extra_turns += record.extra_turns[seat];
                if record.winner.map(Player::index) == Some(seat) {
                    tally.wins += 1;
                }
            }
        }
        if record.winner.is_none() {
            result.draws += 1;
        }
    }

    Ok(result)
}
