//! Board catalog: which widths exist and which the player has unlocked

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A board width offered to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of peg rows (slots = line_count + 1)
    pub line_count: usize,

    /// Price to unlock; 0 means available from the start
    pub unlock_price: i64,
}

impl BoardConfig {
    pub fn free(line_count: usize) -> Self {
        Self {
            line_count,
            unlock_price: 0,
        }
    }

    pub fn locked(line_count: usize, unlock_price: i64) -> Self {
        Self {
            line_count,
            unlock_price,
        }
    }
}

/// Default offering: 8..=12 lines free, 13..=16 behind a price
pub fn default_boards() -> Vec<BoardConfig> {
    vec![
        BoardConfig::free(8),
        BoardConfig::free(9),
        BoardConfig::free(10),
        BoardConfig::free(11),
        BoardConfig::free(12),
        BoardConfig::locked(13, 5_000),
        BoardConfig::locked(14, 10_000),
        BoardConfig::locked(15, 25_000),
        BoardConfig::locked(16, 50_000),
    ]
}

/// Tracks unlock state over a fixed set of boards
#[derive(Debug, Clone)]
pub struct BoardCatalog {
    boards: Vec<BoardConfig>,
    unlocked: BTreeSet<usize>,
}

impl BoardCatalog {
    pub fn new(boards: Vec<BoardConfig>) -> Self {
        let unlocked = boards
            .iter()
            .filter(|b| b.unlock_price <= 0)
            .map(|b| b.line_count)
            .collect();
        Self { boards, unlocked }
    }

    pub fn get(&self, line_count: usize) -> Option<&BoardConfig> {
        self.boards.iter().find(|b| b.line_count == line_count)
    }

    pub fn is_unlocked(&self, line_count: usize) -> bool {
        self.unlocked.contains(&line_count)
    }

    /// Mark a board unlocked; returns false if it was already unlocked or unknown
    pub fn unlock(&mut self, line_count: usize) -> bool {
        if self.get(line_count).is_none() {
            return false;
        }
        self.unlocked.insert(line_count)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = usize> + '_ {
        self.unlocked.iter().copied()
    }

    pub fn boards(&self) -> &[BoardConfig] {
        &self.boards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_unlock_state() {
        let catalog = BoardCatalog::new(default_boards());
        assert!(catalog.is_unlocked(8));
        assert!(catalog.is_unlocked(12));
        assert!(!catalog.is_unlocked(13));
        assert_eq!(catalog.get(16).map(|b| b.unlock_price), Some(50_000));
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut catalog = BoardCatalog::new(default_boards());
        assert!(catalog.unlock(14));
        assert!(!catalog.unlock(14));
        assert!(!catalog.unlock(99));
        assert!(catalog.is_unlocked(14));
    }
}
