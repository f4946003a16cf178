//! Standard seeding permutations.
//!
//! Each table lists seeds in slot order: slot 1 holds seed 1, slot 2 holds the
//! weakest seed, and so on, so that seed 1 meets the weakest remaining seed in
//! every round.

use crate::match_id::BracketSize;

const SEED_ORDER_16: [u8; 16] = [1, 16, 8, 9, 4, 13, 5, 12, 2, 15, 7, 10, 3, 14, 6, 11];

const SEED_ORDER_32: [u8; 32] = [
    1, 32, 16, 17, 8, 25, 9, 24, 4, 29, 13, 20, 5, 28, 12, 21, 2, 31, 15, 18, 7, 26, 10, 23, 3,
    30, 14, 19, 6, 27, 11, 22,
];

/// Seed rank for each slot, indexed by `slot - 1`
pub fn seed_order(size: BracketSize) -> &'static [u8] {
    match size {
        BracketSize::Top16 => &SEED_ORDER_16,
        BracketSize::Top32 => &SEED_ORDER_32,
    }
}

/// First-round pairings as (top seed, bottom seed)
pub fn first_round_pairings(size: BracketSize) -> Vec<(u8, u8)> {
    seed_order(size)
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
#[path = "seed_table_tests.rs"]
mod seed_table_tests;
