//! Ball simulation resources
//!
//! - **pool**: arena of reusable ball handles with O(1) acquire/release
//! - **trajectory**: per-tick ball motion ending in exactly one slot

pub mod pool;
pub mod trajectory;

pub use pool::{
    BallPosition, HandleId, HandleState, PoolConfig, PoolError, PoolGrowth, PoolSnapshot,
    ReleaseOutcome, SimulationHandle, SimulationPool,
};
pub use trajectory::{PegWalk, PegWalkLauncher, StepOutcome, Trajectory, TrajectoryLauncher};
