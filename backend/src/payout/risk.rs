//! Risk tiers and their compiled-in base curves

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of anchor points on every base curve
pub const ANCHOR_COUNT: usize = 8;

const LOW_CURVE: [f64; ANCHOR_COUNT] = [0.5, 0.9, 1.0, 1.4, 1.7, 3.5, 7.0, 18.0];
const MEDIUM_CURVE: [f64; ANCHOR_COUNT] = [0.4, 0.6, 0.9, 1.5, 2.6, 4.5, 15.0, 35.0];
const HIGH_CURVE: [f64; ANCHOR_COUNT] = [0.2, 0.3, 0.6, 1.7, 3.0, 5.0, 25.0, 550.0];

/// Payout-curve preset trading win frequency against maximum multiplier
///
/// Anchors run from the board center (index 0) out to the edges (index 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// The unscaled 8-point base curve for this tier
    pub fn base_curve(self) -> &'static [f64; ANCHOR_COUNT] {
        match self {
            RiskTier::Low => &LOW_CURVE,
            RiskTier::Medium => &MEDIUM_CURVE,
            RiskTier::High => &HIGH_CURVE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "easy" => Ok(RiskTier::Low),
            "medium" | "normal" => Ok(RiskTier::Medium),
            "high" | "hard" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curves_are_non_decreasing_toward_edges() {
        for tier in RiskTier::ALL {
            let curve = tier.base_curve();
            assert!(
                curve.windows(2).all(|w| w[0] <= w[1]),
                "{} curve must grow toward the edges",
                tier
            );
        }
    }

    #[test]
    fn test_parse_accepts_selector_aliases() {
        assert_eq!("Easy".parse::<RiskTier>(), Ok(RiskTier::Low));
        assert_eq!("normal".parse::<RiskTier>(), Ok(RiskTier::Medium));
        assert_eq!("HIGH".parse::<RiskTier>(), Ok(RiskTier::High));
        assert!("extreme".parse::<RiskTier>().is_err());
    }
}
