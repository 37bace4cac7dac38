//! Multiplier table generation tests
//!
//! Critical invariants tested:
//! - Length: one entry per slot (line_count + 1)
//! - Symmetry about the board center
//! - Determinism: same inputs, bit-identical output
//! - Risk ordering of the maximum multiplier
//! - Scaling law: only the extreme anchor grows with line count

use plinko_payout_core::payout::{
    generate, scaled_anchors, RiskTier, TableError, MAX_EXTREME_MULTIPLIER,
};
use proptest::prelude::*;

fn tier() -> impl Strategy<Value = RiskTier> {
    prop_oneof![Just(RiskTier::Low), Just(RiskTier::Medium), Just(RiskTier::High)]
}

// ============================================================================
// Reference Tables
// ============================================================================

#[test]
fn test_eight_lines_low() {
    let table = generate(8, RiskTier::Low).unwrap();
    assert_eq!(table.values(), &[5.9, 2.9, 1.4, 1.0, 0.5, 1.0, 1.4, 2.9, 5.9]);
}

#[test]
fn test_eight_lines_medium() {
    let table = generate(8, RiskTier::Medium).unwrap();
    assert_eq!(table.values(), &[12.5, 3.9, 1.6, 0.8, 0.4, 0.8, 1.6, 3.9, 12.5]);
}

#[test]
fn test_eight_lines_high() {
    let table = generate(8, RiskTier::High).unwrap();
    assert_eq!(table.values(), &[32.7, 4.3, 1.8, 0.5, 0.2, 0.5, 1.8, 4.3, 32.7]);
}

#[test]
fn test_sixteen_lines_low() {
    let table = generate(16, RiskTier::Low).unwrap();
    assert_eq!(
        table.values(),
        &[13.5, 6.2, 3.4, 1.9, 1.5, 1.2, 1.0, 0.8, 0.5, 0.8, 1.0, 1.2, 1.5, 1.9, 3.4, 6.2, 13.5]
    );
}

#[test]
fn test_sixteen_lines_high_edge() {
    let table = generate(16, RiskTier::High).unwrap();
    assert_eq!(table.get(0), Some(333.8));
    assert_eq!(table.get(16), Some(333.8));
    assert_eq!(table.get(8), Some(0.2));
}

#[test]
fn test_twelve_lines_high() {
    let table = generate(12, RiskTier::High).unwrap();
    assert_eq!(
        table.values(),
        &[114.6, 12.7, 3.6, 2.0, 0.8, 0.3, 0.2, 0.3, 0.8, 2.0, 3.6, 12.7, 114.6]
    );
}

// ============================================================================
// Center Handling
// ============================================================================

#[test]
fn test_odd_line_count_has_single_center() {
    let table = generate(8, RiskTier::Medium).unwrap();
    let center = table.get(4).unwrap();
    assert_eq!(center, 0.4, "center takes the first anchor");
    assert_eq!(table.min(), center);
}

#[test]
fn test_even_slot_count_shares_center() {
    for tier in RiskTier::ALL {
        let table = generate(9, tier).unwrap();
        let anchor = tier.base_curve()[0];
        assert_eq!(table.get(4), Some(anchor), "{} left center", tier);
        assert_eq!(table.get(5), Some(anchor), "{} right center", tier);
    }
}

#[test]
fn test_small_boards() {
    assert_eq!(generate(1, RiskTier::High).unwrap().values(), &[0.2, 0.2]);
    assert_eq!(generate(2, RiskTier::Low).unwrap().values(), &[2.9, 0.5, 2.9]);
    assert_eq!(generate(3, RiskTier::High).unwrap().values(), &[10.0, 0.2, 0.2, 10.0]);
}

#[test]
fn test_zero_lines_is_an_error() {
    for tier in RiskTier::ALL {
        assert_eq!(
            generate(0, tier),
            Err(TableError::InvalidBoardConfiguration { line_count: 0 })
        );
    }
}

// ============================================================================
// Scaling Law
// ============================================================================

#[test]
fn test_extreme_anchor_grows_with_width() {
    let narrow = scaled_anchors(8, RiskTier::High);
    let wide = scaled_anchors(12, RiskTier::High);
    assert!(wide[7] > narrow[7]);
    assert_eq!(&wide[..7], &narrow[..7]);
}

#[test]
fn test_extreme_anchor_cap() {
    assert_eq!(scaled_anchors(20, RiskTier::High)[7], MAX_EXTREME_MULTIPLIER);
    assert_eq!(scaled_anchors(64, RiskTier::Medium)[7], MAX_EXTREME_MULTIPLIER);

    // Edges are a blend toward the anchor, so the table stays below the cap
    let table = generate(20, RiskTier::High).unwrap();
    assert_eq!(table.get(0), Some(675.0));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_length_matches_slot_count(line_count in 1usize..=64, risk in tier()) {
        let table = generate(line_count, risk).unwrap();
        prop_assert_eq!(table.len(), line_count + 1);
        prop_assert_eq!(table.line_count(), line_count);
    }

    #[test]
    fn prop_symmetric(line_count in 1usize..=64, risk in tier()) {
        let table = generate(line_count, risk).unwrap();
        let values = table.values();
        for i in 0..values.len() {
            prop_assert_eq!(values[i], values[values.len() - 1 - i]);
        }
    }

    #[test]
    fn prop_deterministic(line_count in 1usize..=64, risk in tier()) {
        let a = generate(line_count, risk).unwrap();
        let b = generate(line_count, risk).unwrap();
        let a_bits: Vec<u64> = a.values().iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u64> = b.values().iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn prop_values_positive_and_one_decimal(line_count in 1usize..=64, risk in tier()) {
        let table = generate(line_count, risk).unwrap();
        for &value in table.values() {
            prop_assert!(value > 0.0);
            prop_assert!(value <= MAX_EXTREME_MULTIPLIER);
            let scaled = value * 10.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6, "{} has more than one decimal", value);
        }
    }

    #[test]
    fn prop_higher_risk_has_higher_maximum(line_count in 2usize..=64) {
        let low = generate(line_count, RiskTier::Low).unwrap().max();
        let medium = generate(line_count, RiskTier::Medium).unwrap().max();
        let high = generate(line_count, RiskTier::High).unwrap().max();
        prop_assert!(high >= medium, "lines {}: high {} < medium {}", line_count, high, medium);
        prop_assert!(medium >= low, "lines {}: medium {} < low {}", line_count, medium, low);
    }

    #[test]
    fn prop_only_extreme_anchor_scales(line_count in 1usize..=64, risk in tier()) {
        let base = risk.base_curve();
        let anchors = scaled_anchors(line_count, risk);
        prop_assert_eq!(&anchors[..7], &base[..7]);

        let expected = (base[7] * (line_count as f64 / 16.0).powf(3.2)).min(MAX_EXTREME_MULTIPLIER);
        prop_assert_eq!(anchors[7], expected);
    }
}
