//! Simulation handle pool
//!
//! Arena of handle slots plus a free-index stack. Acquire pops an index,
//! release pushes it back; neither does a lookup beyond indexing.
//!
//! # Critical Invariants
//!
//! 1. `active_count + free.len() == handles.len()` after every call
//! 2. A handle on the free stack is never Active
//! 3. A handle is Active for at most one trajectory; a stale `HandleId`
//!    (older generation) can never release the slot's current occupant
//!
//! The pool itself is unbounded by default. Callers enforce the hard
//! concurrency ceiling before calling `acquire`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Identity of a pooled handle
///
/// `generation` increments every time the slot is handed out, so an id
/// kept past its release stops matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId {
    index: u32,
    generation: u32,
}

impl HandleId {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ball#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleState {
    Idle,
    Active,
}

/// Where a ball is on the peg field
///
/// `row` counts peg rows already passed; `column` counts rightward
/// deflections so far, so on landing it is the slot index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallPosition {
    pub row: usize,
    pub column: usize,
}

/// One reusable ball
#[derive(Debug, Clone)]
pub struct SimulationHandle {
    id: HandleId,
    state: HandleState,
    position: BallPosition,
}

impl SimulationHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn position(&self) -> BallPosition {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.state == HandleState::Active
    }
}

/// What the pool does when every handle is in use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolGrowth {
    /// Instantiate a fresh handle
    #[default]
    Unbounded,
    /// Report exhaustion
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Handles created up front
    pub initial_size: usize,
    pub growth: PoolGrowth,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 50,
            growth: PoolGrowth::Unbounded,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("Simulation pool exhausted: all {capacity} handles are active")]
    Exhausted { capacity: usize },

    #[error("Handle {index} is on the free stack while active")]
    ActiveOnFreeStack { index: usize },

    #[error("Cannot snapshot pool: {active} handles are active")]
    HandlesActive { active: usize },

    #[error("Invalid pool snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Idle pool state: each slot's generation plus the free-stack order
///
/// Restoring both makes the restored pool hand out the same `HandleId`s,
/// in the same order, as the pool it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub generations: Vec<u32>,
    pub free: Vec<u32>,
}

/// Result of a release request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Handle returned to the free stack; others still active
    Released,
    /// Handle returned and the active set is now empty
    Drained,
    /// Unknown, stale, or already idle handle; nothing changed
    Ignored,
}

/// Arena-backed pool of simulation handles
///
/// # Example
/// ```
/// use plinko_payout_core::simulation::{PoolConfig, ReleaseOutcome, SimulationPool};
///
/// let mut pool = SimulationPool::new(PoolConfig::default());
/// let ball = pool.acquire().unwrap();
/// assert_eq!(pool.active_count(), 1);
///
/// assert_eq!(pool.release(ball), ReleaseOutcome::Drained);
/// assert_eq!(pool.release(ball), ReleaseOutcome::Ignored);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationPool {
    handles: Vec<SimulationHandle>,
    free: Vec<u32>,
    active_count: usize,
    growth: PoolGrowth,
}

impl SimulationPool {
    pub fn new(config: PoolConfig) -> Self {
        let mut pool = Self {
            handles: Vec::with_capacity(config.initial_size),
            free: Vec::with_capacity(config.initial_size),
            active_count: 0,
            growth: config.growth,
        };
        for _ in 0..config.initial_size {
            let index = pool.create_handle();
            pool.free.push(index);
        }
        // Pop order hands out index 0 first
        pool.free.reverse();
        pool
    }

    fn create_handle(&mut self) -> u32 {
        let index = self.handles.len() as u32;
        self.handles.push(SimulationHandle {
            id: HandleId { index, generation: 0 },
            state: HandleState::Idle,
            position: BallPosition::default(),
        });
        index
    }

    /// Whether the next `acquire` will succeed
    pub fn can_acquire(&self) -> bool {
        self.growth == PoolGrowth::Unbounded || !self.free.is_empty()
    }

    /// Take an idle handle, mark it Active and return its id
    pub fn acquire(&mut self) -> Result<HandleId, PoolError> {
        let index = match self.free.pop() {
            // Active-set membership check before reassignment
            Some(index) if self.handles[index as usize].is_active() => {
                self.free.push(index);
                return Err(PoolError::ActiveOnFreeStack {
                    index: index as usize,
                });
            }
            Some(index) => index,
            None => match self.growth {
                PoolGrowth::Unbounded => self.create_handle(),
                PoolGrowth::Fixed => {
                    return Err(PoolError::Exhausted {
                        capacity: self.handles.len(),
                    })
                }
            },
        };

        let handle = &mut self.handles[index as usize];
        handle.id.generation = handle.id.generation.wrapping_add(1);
        handle.state = HandleState::Active;
        handle.position = BallPosition::default();
        self.active_count += 1;

        debug!(handle = %handle.id, active = self.active_count, "handle acquired");
        Ok(handle.id)
    }

    /// Return a handle to the pool; idempotent
    pub fn release(&mut self, id: HandleId) -> ReleaseOutcome {
        let Some(handle) = self.handles.get_mut(id.index()) else {
            return ReleaseOutcome::Ignored;
        };
        if handle.id != id || !handle.is_active() {
            return ReleaseOutcome::Ignored;
        }

        handle.state = HandleState::Idle;
        handle.position = BallPosition::default();
        self.free.push(id.index);
        self.active_count -= 1;

        debug!(handle = %id, active = self.active_count, "handle released");
        if self.active_count == 0 {
            ReleaseOutcome::Drained
        } else {
            ReleaseOutcome::Released
        }
    }

    /// Force-release every active handle, lowest index first
    ///
    /// Returns the ids that were released. Calling it again is a no-op.
    pub fn release_all(&mut self) -> Vec<HandleId> {
        let active = self.active_ids();
        for id in &active {
            self.release(*id);
        }
        active
    }

    /// Record a trajectory's latest position; false if `id` is not active
    pub fn set_position(&mut self, id: HandleId, position: BallPosition) -> bool {
        match self.handles.get_mut(id.index()) {
            Some(handle) if handle.id == id && handle.is_active() => {
                handle.position = position;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: HandleId) -> Option<&SimulationHandle> {
        self.handles.get(id.index()).filter(|h| h.id == id)
    }

    pub fn is_active(&self, id: HandleId) -> bool {
        self.get(id).is_some_and(SimulationHandle::is_active)
    }

    /// Ids of all active handles in ascending index order
    pub fn active_ids(&self) -> Vec<HandleId> {
        self.handles
            .iter()
            .filter(|h| h.is_active())
            .map(|h| h.id)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn idle_count(&self) -> usize {
        self.free.len()
    }

    /// Every handle ever instantiated, active or idle
    pub fn total_created(&self) -> usize {
        self.handles.len()
    }

    pub fn growth(&self) -> PoolGrowth {
        self.growth
    }

    /// Capture the pool while no handle is active
    pub fn snapshot(&self) -> Result<PoolSnapshot, PoolError> {
        if self.active_count > 0 {
            return Err(PoolError::HandlesActive {
                active: self.active_count,
            });
        }
        Ok(PoolSnapshot {
            generations: self.handles.iter().map(|h| h.id.generation).collect(),
            free: self.free.clone(),
        })
    }

    /// Rebuild an idle pool from a snapshot
    pub fn restore(growth: PoolGrowth, snapshot: &PoolSnapshot) -> Result<Self, PoolError> {
        let handles = snapshot
            .generations
            .iter()
            .enumerate()
            .map(|(index, &generation)| SimulationHandle {
                id: HandleId {
                    index: index as u32,
                    generation,
                },
                state: HandleState::Idle,
                position: BallPosition::default(),
            })
            .collect();
        let pool = Self {
            handles,
            free: snapshot.free.clone(),
            active_count: 0,
            growth,
        };
        pool.check_invariants().map_err(PoolError::InvalidSnapshot)?;
        Ok(pool)
    }

    /// Verify the pool's bookkeeping invariants
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.active_count + self.free.len() != self.handles.len() {
            return Err(format!(
                "active ({}) + free ({}) != total ({})",
                self.active_count,
                self.free.len(),
                self.handles.len()
            ));
        }

        let mut on_free_stack = vec![false; self.handles.len()];
        for &index in &self.free {
            let slot = on_free_stack
                .get_mut(index as usize)
                .ok_or_else(|| format!("free stack holds unknown index {}", index))?;
            if *slot {
                return Err(format!("index {} appears twice on the free stack", index));
            }
            *slot = true;
            if self.handles[index as usize].is_active() {
                return Err(format!("active handle {} is on the free stack", index));
            }
        }

        let active = self.handles.iter().filter(|h| h.is_active()).count();
        if active != self.active_count {
            return Err(format!(
                "active count {} disagrees with {} active handles",
                self.active_count, active
            ));
        }

        Ok(())
    }
}
