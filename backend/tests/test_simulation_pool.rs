//! Simulation pool tests
//!
//! Critical invariants tested:
//! - active + idle == total at every step
//! - A handle is never handed out twice while active
//! - Release is idempotent; the last release reports Drained
//! - Fixed pools report exhaustion, unbounded pools grow

use plinko_payout_core::simulation::{
    PoolConfig, PoolError, PoolGrowth, ReleaseOutcome, SimulationPool,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn fixed(initial_size: usize) -> SimulationPool {
    SimulationPool::new(PoolConfig {
        initial_size,
        growth: PoolGrowth::Fixed,
    })
}

#[test]
fn test_default_pool_prewarms_fifty() {
    let pool = SimulationPool::new(PoolConfig::default());
    assert_eq!(pool.total_created(), 50);
    assert_eq!(pool.idle_count(), 50);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.growth(), PoolGrowth::Unbounded);
}

#[test]
fn test_acquired_handles_are_distinct() {
    let mut pool = fixed(5);
    let ids: Vec<_> = (0..5).map(|_| pool.acquire().unwrap()).collect();

    let unique: HashSet<_> = ids.iter().map(|id| id.index()).collect();
    assert_eq!(unique.len(), 5);
    assert_eq!(pool.active_ids(), ids);
}

#[test]
fn test_fixed_pool_exhaustion() {
    let mut pool = fixed(2);
    pool.acquire().unwrap();
    pool.acquire().unwrap();

    assert!(!pool.can_acquire());
    assert_eq!(pool.acquire(), Err(PoolError::Exhausted { capacity: 2 }));
    assert_eq!(pool.active_count(), 2);
}

#[test]
fn test_unbounded_pool_grows() {
    let mut pool = SimulationPool::new(PoolConfig {
        initial_size: 1,
        growth: PoolGrowth::Unbounded,
    });
    pool.acquire().unwrap();
    assert!(pool.can_acquire());

    pool.acquire().unwrap();
    assert_eq!(pool.total_created(), 2);
    assert_eq!(pool.active_count(), 2);
}

#[test]
fn test_empty_unbounded_pool_grows_on_demand() {
    let mut pool = SimulationPool::new(PoolConfig {
        initial_size: 0,
        growth: PoolGrowth::Unbounded,
    });
    let id = pool.acquire().unwrap();
    assert_eq!(id.index(), 0);
    assert_eq!(pool.total_created(), 1);
}

#[test]
fn test_release_outcomes() {
    let mut pool = fixed(3);
    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();

    assert_eq!(pool.release(a), ReleaseOutcome::Released);
    assert_eq!(pool.release(a), ReleaseOutcome::Ignored, "double release is a no-op");
    assert_eq!(pool.active_count(), 1);

    assert_eq!(pool.release(b), ReleaseOutcome::Drained);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.idle_count(), 3);
}

#[test]
fn test_reused_handle_gets_new_generation() {
    let mut pool = fixed(1);
    let first = pool.acquire().unwrap();
    pool.release(first);
    let second = pool.acquire().unwrap();

    assert_eq!(first.index(), second.index());
    assert_ne!(first, second);
    assert!(!pool.is_active(first));
    assert!(pool.is_active(second));
}

#[test]
fn test_release_all() {
    let mut pool = fixed(4);
    let ids: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();

    assert_eq!(pool.release_all(), ids);
    assert_eq!(pool.active_count(), 0);
    assert!(pool.release_all().is_empty());
    pool.check_invariants().unwrap();
}

#[derive(Debug, Clone)]
enum PoolOp {
    Acquire,
    Release(usize),
    ReleaseAll,
}

fn pool_op() -> impl Strategy<Value = PoolOp> {
    prop_oneof![
        4 => Just(PoolOp::Acquire),
        3 => (0usize..16).prop_map(PoolOp::Release),
        1 => Just(PoolOp::ReleaseAll),
    ]
}

proptest! {
    #[test]
    fn prop_pool_bookkeeping_holds(
        initial_size in 0usize..8,
        unbounded in any::<bool>(),
        ops in prop::collection::vec(pool_op(), 1..200),
    ) {
        let growth = if unbounded { PoolGrowth::Unbounded } else { PoolGrowth::Fixed };
        let mut pool = SimulationPool::new(PoolConfig { initial_size, growth });
        let mut held = Vec::new();

        for op in ops {
            match op {
                PoolOp::Acquire => match pool.acquire() {
                    Ok(id) => {
                        prop_assert!(!held.contains(&id), "{} handed out twice", id);
                        held.push(id);
                    }
                    Err(PoolError::Exhausted { .. }) => {
                        prop_assert_eq!(growth, PoolGrowth::Fixed);
                        prop_assert_eq!(held.len(), pool.total_created());
                    }
                    Err(other) => prop_assert!(false, "unexpected acquire error {:?}", other),
                },
                PoolOp::Release(pick) => {
                    if !held.is_empty() {
                        let id = held.remove(pick % held.len());
                        let outcome = pool.release(id);
                        let expected = if held.is_empty() {
                            ReleaseOutcome::Drained
                        } else {
                            ReleaseOutcome::Released
                        };
                        prop_assert_eq!(outcome, expected);
                    }
                }
                PoolOp::ReleaseAll => {
                    let released = pool.release_all();
                    prop_assert_eq!(released.len(), held.len());
                    held.clear();
                }
            }

            prop_assert_eq!(pool.active_count(), held.len());
            prop_assert_eq!(pool.active_count() + pool.idle_count(), pool.total_created());
            if let Err(msg) = pool.check_invariants() {
                prop_assert!(false, "{}", msg);
            }
        }
    }
}
