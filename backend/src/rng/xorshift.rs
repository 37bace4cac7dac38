//! xorshift64* random number generator
//!
//! Small, fast and fully deterministic. Same seed → same sequence of peg
//! deflections → same slot landings, which is what makes sessions
//! replayable from a checkpoint.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use plinko_payout_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let bounce_right = rng.coin_flip();
/// let column = rng.range(0, 9); // [0, 9)
/// # let _ = (bounce_right, column);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is coerced to 1 because xorshift never leaves the zero state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Top 53 bits fill the mantissa exactly
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Fair coin: `true` means the ball deflects right off a peg
    ///
    /// # Example
    /// ```
    /// use plinko_payout_core::RngManager;
    ///
    /// let mut a = RngManager::new(7);
    /// let mut b = RngManager::new(7);
    /// assert_eq!(a.coin_flip(), b.coin_flip());
    /// ```
    pub fn coin_flip(&mut self) -> bool {
        self.next_f64() < 0.5
    }

    /// Current internal state, used as the seed when restoring a checkpoint
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
