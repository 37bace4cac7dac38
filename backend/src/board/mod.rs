//! Board model
//!
//! A board is the row of payout slots under the pegs. The controller owns
//! the slots for one width and rewrites their multipliers whenever the risk
//! tier changes. The catalog tracks which widths the player may use.

pub mod catalog;
pub mod controller;
pub mod slot;

pub use catalog::{BoardCatalog, BoardConfig};
pub use controller::{BoardController, BoardError, SlotHit};
pub use slot::{BandThresholds, DisplayBand, PayoutSlot, SlotTint};
