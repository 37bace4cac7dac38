//! Bet sizing
//!
//! Keeps the player's chosen stake inside `[min_stake, balance]`. When the
//! balance drops below the floor the floor wins; `place_bet` will then
//! reject the stake with `InsufficientBalance`.

/// Current stake plus the plus/minus/min/max controls around it
#[derive(Debug, Clone, PartialEq)]
pub struct BetSizer {
    current: i64,
    min_stake: i64,
    step: i64,
}

impl BetSizer {
    pub fn new(min_stake: i64, step: i64) -> Self {
        assert!(min_stake > 0, "min_stake must be positive");
        assert!(step > 0, "step must be positive");
        Self {
            current: min_stake,
            min_stake,
            step,
        }
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    /// Set the stake, clamped to what the balance allows
    pub fn set(&mut self, value: i64, balance: i64) -> i64 {
        let ceiling = balance.max(self.min_stake);
        self.current = value.clamp(self.min_stake, ceiling);
        self.current
    }

    pub fn increase(&mut self, balance: i64) -> i64 {
        self.set(self.current + self.step, balance)
    }

    pub fn decrease(&mut self, balance: i64) -> i64 {
        self.set(self.current - self.step, balance)
    }

    pub fn set_min(&mut self) -> i64 {
        self.current = self.min_stake;
        self.current
    }

    pub fn set_max(&mut self, balance: i64) -> i64 {
        self.set(balance, balance)
    }

    pub fn can_increase(&self, balance: i64) -> bool {
        self.current + self.step <= balance
    }

    pub fn can_decrease(&self) -> bool {
        self.current - self.step >= self.min_stake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_and_decrease_step() {
        let mut bet = BetSizer::new(10, 5);
        assert_eq!(bet.increase(1000), 15);
        assert_eq!(bet.increase(1000), 20);
        assert_eq!(bet.decrease(1000), 15);
    }

    #[test]
    fn test_clamps_to_balance_and_floor() {
        let mut bet = BetSizer::new(10, 5);
        assert_eq!(bet.set(5_000, 1000), 1000);
        assert_eq!(bet.set(3, 1000), 10);
        assert_eq!(bet.set_max(42), 42);
        assert_eq!(bet.set_min(), 10);
    }

    #[test]
    fn test_floor_wins_when_balance_is_short() {
        let mut bet = BetSizer::new(10, 5);
        assert_eq!(bet.set_max(4), 10);
        assert!(!bet.can_increase(4));
        assert!(!bet.can_decrease());
    }
}
