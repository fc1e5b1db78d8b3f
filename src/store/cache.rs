use std::collections::{HashMap, VecDeque};

use crate::games::kalaha::types::Board;

/// Bounded game cache keyed by game id. When full, the entry inserted
/// longest ago is dropped.
pub struct GameCache {
    capacity: usize,
    entries: HashMap<String, Board>,
    order: VecDeque<String>,
}

impl GameCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, game_id: &str) -> Option<&Board> {
        self.entries.get(game_id)
    }

    pub fn put(&mut self, game_id: &str, board: Board) {
        if self.entries.insert(game_id.to_string(), board).is_some() {
            return;
        }
        self.order.push_back(game_id.to_string());
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn evict(&mut self, game_id: &str) -> Option<Board> {
        let removed = self.entries.remove(game_id);
        if removed.is_some() {
            self.order.retain(|id| id != game_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
