//! Payout slots and their display bands

use serde::{Deserialize, Serialize};

/// Colour band a slot is drawn in, from cheapest to richest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayBand {
    Green,
    Yellow1,
    Yellow2,
    Red,
}

/// Band plus how far the slot has blended toward the next band
///
/// `blend` is in `[0, 1]`; a renderer lerps between this band's colour and
/// the next one's by `blend`. Red is terminal and always has `blend == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotTint {
    pub band: DisplayBand,
    pub blend: f64,
}

/// Upper bounds (inclusive) of the green, yellow1 and yellow2 bands,
/// expressed as a fraction of the board's maximum possible multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub green: f64,
    pub yellow1: f64,
    pub yellow2: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            green: 0.25,
            yellow1: 0.50,
            yellow2: 0.75,
        }
    }
}

impl BandThresholds {
    /// Thresholds must be strictly increasing inside (0, 1]
    pub fn is_valid(&self) -> bool {
        0.0 < self.green
            && self.green < self.yellow1
            && self.yellow1 < self.yellow2
            && self.yellow2 <= 1.0
    }

    /// Classify a normalized multiplier (`multiplier / max_possible`)
    ///
    /// # Example
    /// ```
    /// use plinko_payout_core::board::{BandThresholds, DisplayBand};
    ///
    /// let tint = BandThresholds::default().classify(0.375);
    /// assert_eq!(tint.band, DisplayBand::Yellow1);
    /// assert!((tint.blend - 0.5).abs() < 1e-12);
    /// ```
    pub fn classify(&self, normalized: f64) -> SlotTint {
        let blend = |lower: f64, upper: f64| ((normalized - lower) / (upper - lower)).clamp(0.0, 1.0);

        if normalized <= self.green {
            SlotTint {
                band: DisplayBand::Green,
                blend: blend(0.0, self.green),
            }
        } else if normalized <= self.yellow1 {
            SlotTint {
                band: DisplayBand::Yellow1,
                blend: blend(self.green, self.yellow1),
            }
        } else if normalized <= self.yellow2 {
            SlotTint {
                band: DisplayBand::Yellow2,
                blend: blend(self.yellow1, self.yellow2),
            }
        } else {
            SlotTint {
                band: DisplayBand::Red,
                blend: 0.0,
            }
        }
    }
}

/// One board position holding a multiplier
///
/// Created with the board, rewritten only during a table rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutSlot {
    index: usize,
    multiplier: f64,
    tint: SlotTint,
}

impl PayoutSlot {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            multiplier: 0.0,
            tint: SlotTint {
                band: DisplayBand::Green,
                blend: 0.0,
            },
        }
    }

    pub(crate) fn assign(&mut self, multiplier: f64, tint: SlotTint) {
        self.multiplier = multiplier;
        self.tint = tint;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn tint(&self) -> SlotTint {
        self.tint
    }

    pub fn band(&self) -> DisplayBand {
        self.tint.band
    }
}
