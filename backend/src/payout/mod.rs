//! Payout curves
//!
//! Pure, deterministic mapping from `(line_count, risk)` to the ordered
//! multiplier table that a board's slots carry. No state, no randomness.

pub mod generator;
pub mod risk;

pub use generator::{generate, scaled_anchors, MultiplierTable, TableError, MAX_EXTREME_MULTIPLIER};
pub use risk::RiskTier;
