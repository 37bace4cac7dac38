//! Session configuration
//!
//! Plain serde struct with defaults for every field, so a JSON config file
//! only needs to name what it overrides.

use crate::board::catalog::default_boards;
use crate::board::{BandThresholds, BoardConfig};
use crate::models::ledger::DEFAULT_OPENING_BALANCE;
use crate::payout::RiskTier;
use crate::session::error::SessionError;
use crate::simulation::PoolConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Hard ceiling on balls in flight at once
pub const MAX_CONCURRENT_BALLS: usize = 5;

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub opening_balance: i64,

    /// Balls allowed in flight at once
    pub max_concurrent_balls: usize,

    /// Smallest accepted stake; also the bet sizer's floor
    pub min_stake: i64,

    /// Bet sizer increment
    pub bet_step: i64,

    /// Multipliers at or above this emit `BigWin`
    pub big_win_threshold: f64,

    pub rng_seed: u64,

    /// Ticks a ball spends passing one peg row
    pub ticks_per_row: u32,

    /// Board selected when the session starts; must be free
    pub default_line_count: usize,

    pub default_risk: RiskTier,

    pub pool: PoolConfig,

    pub band_thresholds: BandThresholds,

    pub boards: Vec<BoardConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opening_balance: DEFAULT_OPENING_BALANCE,
            max_concurrent_balls: MAX_CONCURRENT_BALLS,
            min_stake: 10,
            bet_step: 5,
            big_win_threshold: 50.0,
            rng_seed: 12345,
            ticks_per_row: 3,
            default_line_count: 8,
            default_risk: RiskTier::Low,
            pool: PoolConfig::default(),
            band_thresholds: BandThresholds::default(),
            boards: default_boards(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.max_concurrent_balls == 0 || self.max_concurrent_balls > MAX_CONCURRENT_BALLS {
            return Err(SessionError::InvalidConfig(format!(
                "max_concurrent_balls ({}) must be between 1 and {}",
                self.max_concurrent_balls, MAX_CONCURRENT_BALLS
            )));
        }

        if self.opening_balance < 0 {
            return Err(SessionError::InvalidConfig(format!(
                "opening_balance ({}) must not be negative",
                self.opening_balance
            )));
        }

        if self.ticks_per_row == 0 {
            return Err(SessionError::InvalidConfig(
                "ticks_per_row must be > 0".to_string(),
            ));
        }

        if self.min_stake <= 0 || self.bet_step <= 0 {
            return Err(SessionError::InvalidConfig(format!(
                "min_stake ({}) and bet_step ({}) must be positive",
                self.min_stake, self.bet_step
            )));
        }

        if !self.band_thresholds.is_valid() {
            return Err(SessionError::InvalidConfig(
                "band thresholds must be strictly increasing within (0, 1]".to_string(),
            ));
        }

        if self.boards.is_empty() {
            return Err(SessionError::InvalidConfig(
                "board catalog must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for board in &self.boards {
            if board.line_count == 0 {
                return Err(SessionError::InvalidBoardConfiguration { line_count: 0 });
            }
            if !seen.insert(board.line_count) {
                return Err(SessionError::InvalidConfig(format!(
                    "duplicate board: {} lines",
                    board.line_count
                )));
            }
        }

        match self
            .boards
            .iter()
            .find(|b| b.line_count == self.default_line_count)
        {
            None => Err(SessionError::InvalidConfig(format!(
                "default board ({} lines) is not in the catalog",
                self.default_line_count
            ))),
            Some(board) if board.unlock_price > 0 => Err(SessionError::InvalidConfig(format!(
                "default board ({} lines) must be free",
                self.default_line_count
            ))),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_locked_default_board_rejected() {
        let config = SessionConfig {
            default_line_count: 16,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_concurrency_above_ceiling_rejected() {
        let config = SessionConfig {
            max_concurrent_balls: MAX_CONCURRENT_BALLS + 5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));

        let zero = SessionConfig {
            max_concurrent_balls: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(SessionError::InvalidConfig(_))));

        let lower = SessionConfig {
            max_concurrent_balls: 2,
            ..Default::default()
        };
        assert_eq!(lower.validate(), Ok(()));
    }

    #[test]
    fn test_negative_opening_balance_rejected() {
        let config = SessionConfig {
            opening_balance: -1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_board_rejected() {
        let config = SessionConfig {
            boards: vec![BoardConfig::free(8), BoardConfig::free(8)],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"rng_seed": 7}"#).unwrap();
        assert_eq!(config.rng_seed, 7);
        assert_eq!(config.max_concurrent_balls, MAX_CONCURRENT_BALLS);
        assert_eq!(config.boards.len(), 9);
    }
}
