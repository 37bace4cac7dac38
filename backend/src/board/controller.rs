//! Board controller
//!
//! Owns the payout slots for one board width. A risk-tier change generates
//! the complete new table first and only then writes it into the slots, so
//! a failed generation leaves the old table intact and nobody observes a
//! half-written board.
//!
//! Display bands are normalized against the High-tier maximum for this
//! width (plus 10% headroom), independent of the selected tier, so the same
//! multiplier always gets the same colour on a given board.

use crate::board::slot::{BandThresholds, PayoutSlot};
use crate::payout::{generate, MultiplierTable, RiskTier, TableError};
use thiserror::Error;
use tracing::debug;

/// Headroom applied on top of the High-tier maximum when normalizing bands
const MAX_MULTIPLIER_HEADROOM: f64 = 1.1;

/// Errors from board operations
#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("Slot {index} out of range for board with {slot_count} slots")]
    SlotOutOfRange { index: usize, slot_count: usize },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// A ball's arrival at a slot, resolved to that slot's multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotHit {
    pub index: usize,
    pub multiplier: f64,
}

/// Payout slots for one board configuration
///
/// # Example
/// ```
/// use plinko_payout_core::board::{BandThresholds, BoardController};
/// use plinko_payout_core::payout::RiskTier;
///
/// let mut board = BoardController::new(9, RiskTier::Low, BandThresholds::default()).unwrap();
/// assert_eq!(board.highest_possible_multiplier(), 5.9);
///
/// board.set_risk_tier(RiskTier::High).unwrap();
/// assert_eq!(board.highest_possible_multiplier(), 32.7);
/// ```
#[derive(Debug, Clone)]
pub struct BoardController {
    slots: Vec<PayoutSlot>,
    table: MultiplierTable,
    risk: RiskTier,
    thresholds: BandThresholds,
    /// High-tier maximum for this width, with headroom
    band_ceiling: f64,
}

impl BoardController {
    /// Build a board with `slot_count` slots (`slot_count - 1` peg rows)
    pub fn new(slot_count: usize, risk: RiskTier, thresholds: BandThresholds) -> Result<Self, BoardError> {
        let line_count = slot_count.saturating_sub(1);
        let table = generate(line_count, risk)?;
        let band_ceiling = generate(line_count, RiskTier::High)?.max() * MAX_MULTIPLIER_HEADROOM;

        let mut board = Self {
            slots: (0..slot_count).map(PayoutSlot::new).collect(),
            table,
            risk,
            thresholds,
            band_ceiling,
        };
        board.apply_table();
        Ok(board)
    }

    /// Rebuild the table for `risk` and reassign every slot
    ///
    /// Slot identities (indices) never change.
    pub fn set_risk_tier(&mut self, risk: RiskTier) -> Result<(), BoardError> {
        let table = generate(self.line_count(), risk)?;
        self.table = table;
        self.risk = risk;
        self.apply_table();

        debug!(
            line_count = self.line_count(),
            risk = %risk,
            highest = self.highest_possible_multiplier(),
            "board table rebuilt"
        );
        Ok(())
    }

    fn apply_table(&mut self) {
        for (slot, &multiplier) in self.slots.iter_mut().zip(self.table.values()) {
            let tint = self.thresholds.classify(multiplier / self.band_ceiling);
            slot.assign(multiplier, tint);
        }
    }

    /// Largest multiplier currently assigned to any slot
    ///
    /// Achievement logic compares a landed multiplier against this to detect
    /// a ceiling hit.
    pub fn highest_possible_multiplier(&self) -> f64 {
        self.slots.iter().map(PayoutSlot::multiplier).fold(0.0, f64::max)
    }

    /// Resolve a landing to the slot's multiplier
    pub fn resolve_arrival(&self, index: usize) -> Result<SlotHit, BoardError> {
        let slot = self.slots.get(index).ok_or(BoardError::SlotOutOfRange {
            index,
            slot_count: self.slots.len(),
        })?;

        Ok(SlotHit {
            index,
            multiplier: slot.multiplier(),
        })
    }

    pub fn slots(&self) -> &[PayoutSlot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn line_count(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    pub fn risk_tier(&self) -> RiskTier {
        self.risk
    }

    pub fn table(&self) -> &MultiplierTable {
        &self.table
    }

    /// Normalization ceiling used for display bands
    pub fn band_ceiling(&self) -> f64 {
        self.band_ceiling
    }
}
