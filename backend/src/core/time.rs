//! Tick clock for the cooperative simulation loop
//!
//! One tick is one pass of the update loop: every in-flight ball is stepped
//! once, landings are settled, and a drained round is finalized. Nothing in
//! the engine runs outside a tick, so there is no parallel writer to guard
//! against.

use serde::{Deserialize, Serialize};

/// Monotonic tick counter
///
/// # Example
/// ```
/// use plinko_payout_core::TickClock;
///
/// let mut clock = TickClock::new();
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance();
/// assert_eq!(clock.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickClock {
    current_tick: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a clock from a checkpointed tick
    pub fn starting_at(tick: u64) -> Self {
        Self { current_tick: tick }
    }

    /// Advance time by one tick
    pub fn advance(&mut self) {
        self.current_tick += 1;
    }

    /// Ticks elapsed since the session started
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }
}
