//! Multiplier table generation
//!
//! # Algorithm
//!
//! ```text
//! 1. Take the 8-point base curve for the risk tier
//! 2. Scale ONLY the extreme anchor by (line_count / 16)^3.2, capped at 1000
//! 3. For each slot i in 0..=line_count:
//!      distance = |i - center|        (distance 0.5 collapses to 0)
//!      t        = distance / (slots / 2)
//!      value    = piecewise-linear interpolation over the anchors at t
//! 4. Round every value to one decimal place
//! ```
//!
//! Wider boards blow out the edge payout superlinearly while the center and
//! mid-board payouts stay put, because only the last anchor scales.
//!
//! # Critical Invariants
//!
//! 1. `table.len() == line_count + 1`
//! 2. `table[i] == table[len - 1 - i]` (symmetric about the center)
//! 3. Same inputs → bit-identical output

use crate::payout::risk::RiskTier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ceiling applied to the scaled extreme anchor
pub const MAX_EXTREME_MULTIPLIER: f64 = 1000.0;

/// Line count at which the base curves are quoted unscaled
const REFERENCE_LINE_COUNT: f64 = 16.0;

/// Growth exponent for the extreme anchor
const EXTREME_SCALE_EXPONENT: f64 = 3.2;

/// Tolerance for recognising the half-slot distance on even-slot boards
const CENTER_TIE_EPSILON: f64 = 1e-9;

/// Errors from table generation
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("Invalid board configuration: line_count must be at least 1 (got {line_count})")]
    InvalidBoardConfiguration { line_count: usize },
}

/// Ordered payout multipliers for one board configuration
///
/// Immutable once built. A risk-tier or width change builds a new table and
/// swaps it in whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable {
    values: Vec<f64>,
}

impl MultiplierTable {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Largest multiplier on the board (an edge slot)
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Smallest multiplier on the board (a center slot)
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Number of peg rows this table was generated for
    pub fn line_count(&self) -> usize {
        self.values.len().saturating_sub(1)
    }
}

/// Generate the multiplier table for a board
///
/// # Errors
///
/// `InvalidBoardConfiguration` when `line_count == 0`. A zero-line board
/// is a programming error, not something to retry.
///
/// # Example
/// ```
/// use plinko_payout_core::payout::{generate, RiskTier};
///
/// let table = generate(8, RiskTier::Low).unwrap();
/// assert_eq!(table.values(), &[5.9, 2.9, 1.4, 1.0, 0.5, 1.0, 1.4, 2.9, 5.9]);
/// ```
pub fn generate(line_count: usize, risk: RiskTier) -> Result<MultiplierTable, TableError> {
    if line_count == 0 {
        return Err(TableError::InvalidBoardConfiguration { line_count });
    }

    let slot_count = line_count + 1;
    let anchors = scaled_anchors(line_count, risk);
    let center = (slot_count - 1) as f64 / 2.0;
    let half_width = slot_count as f64 / 2.0;

    let values = (0..slot_count)
        .map(|i| {
            let mut distance = (i as f64 - center).abs();
            // Even slot count: both middle slots are the center
            if (distance - 0.5).abs() < CENTER_TIE_EPSILON {
                distance = 0.0;
            }
            let t = if half_width > 0.5 { distance / half_width } else { 0.0 };
            round_one_decimal(interpolate(&anchors, t))
        })
        .collect();

    Ok(MultiplierTable { values })
}

/// The base curve for `risk` with its extreme anchor scaled for `line_count`
///
/// Exposed so callers can reason about the scaling law without going through
/// interpolation and rounding.
pub fn scaled_anchors(line_count: usize, risk: RiskTier) -> Vec<f64> {
    let mut anchors = risk.base_curve().to_vec();
    let scale = (line_count as f64 / REFERENCE_LINE_COUNT).powf(EXTREME_SCALE_EXPONENT);

    if let Some(extreme) = anchors.last_mut() {
        *extreme = (*extreme * scale).min(MAX_EXTREME_MULTIPLIER);
    }

    anchors
}

fn interpolate(anchors: &[f64], t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let last = anchors.len() - 1;
    let position = t * last as f64;
    let index = position.floor() as usize;

    if index >= last {
        return anchors[last];
    }

    let frac = position - index as f64;
    anchors[index] * (1.0 - frac) + anchors[index + 1] * frac
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
