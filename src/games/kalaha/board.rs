//! Pit-position arithmetic for the two-player ring.
//!
//! Pits are numbered 1..=14. Player one owns 1..=6 plus store 7, player two
//! owns 8..=13 plus store 14. Sowing runs in increasing order and wraps.

use super::types::Player;

pub const PITS_PER_SIDE: usize = 6;
pub const TOTAL_PITS: usize = 14;
pub const PLAYER_ONE_STORE: usize = 7;
pub const PLAYER_TWO_STORE: usize = 14;
/// Positions a mover's stones can reach: every pit but the opponent's store.
pub const SOWING_RING: usize = TOTAL_PITS - 1;

/// Every seventh position is a store, whatever the number of players.
pub fn is_store_pit(pit_id: usize) -> bool {
    pit_id > 0 && pit_id % (PITS_PER_SIDE + 1) == 0
}

pub fn store_of(player: Player) -> usize {
    match player {
        Player::PlayerOne => PLAYER_ONE_STORE,
        Player::PlayerTwo => PLAYER_TWO_STORE,
    }
}

/// Owning side of a pit (store included), or None when off the ring.
pub fn owner_of(pit_id: usize) -> Option<Player> {
    match pit_id {
        1..=PLAYER_ONE_STORE => Some(Player::PlayerOne),
        8..=PLAYER_TWO_STORE => Some(Player::PlayerTwo),
        _ => None,
    }
}

/// True for a playing pit (not a store) on `player`'s side.
pub fn is_own_playing_pit(pit_id: usize, player: Player) -> bool {
    !is_store_pit(pit_id) && owner_of(pit_id) == Some(player)
}

/// Pit facing `pit_id` across the board. Only meaningful for playing pits.
pub fn opposite_pit(pit_id: usize) -> usize {
    TOTAL_PITS - pit_id
}

/// Next position for `mover`'s sowing, skipping the opponent's store.
pub fn next_pit(current: usize, mover: Player) -> usize {
    let next = current % TOTAL_PITS + 1;
    if next == store_of(mover.opponent()) {
        next % TOTAL_PITS + 1
    } else {
        next
    }
}
