pub mod kalaha;

use std::collections::HashMap;

use crate::engine::plugin::SowingRules;
use crate::error::GameError;

/// Registry of rule sets, keyed by the number of players they support.
pub struct RulesRegistry {
    rules: HashMap<usize, Box<dyn SowingRules>>,
}

impl RulesRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            rules: HashMap::new(),
        };
        registry.register(Box::new(kalaha::TwoPlayerSowing));
        registry
    }

    pub fn register(&mut self, rules: Box<dyn SowingRules>) {
        let players = rules.number_of_players();
        self.rules.insert(players, rules);
    }

    /// Rules for a board with `number_of_players` players.
    pub fn rules_for(&self, number_of_players: usize) -> Result<&dyn SowingRules, GameError> {
        self.rules
            .get(&number_of_players)
            .map(|r| r.as_ref())
            .ok_or_else(|| {
                GameError::InvalidConfiguration("currently only two players are supported".into())
            })
    }

    pub fn supported_player_counts(&self) -> Vec<usize> {
        let mut counts: Vec<usize> = self.rules.keys().copied().collect();
        counts.sort_unstable();
        counts
    }
}

impl Default for RulesRegistry {
    fn default() -> Self {
        Self::new()
    }
}
