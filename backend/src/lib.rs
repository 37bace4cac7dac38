//! Plinko Payout Core - Rust Engine
//!
//! Deterministic payout engine for a Plinko-style drop game: multiplier
//! table generation, board slots, pooled ball simulation and the
//! bet / settle session loop.
//!
//! # Architecture
//!
//! - **core**: Tick clock
//! - **rng**: Deterministic random number generation
//! - **payout**: Risk tiers and multiplier table generation
//! - **board**: Payout slots, display bands, board catalog
//! - **models**: Ledger and session events
//! - **events**: Publish/subscribe delivery of events
//! - **simulation**: Ball handle pool and trajectories
//! - **session**: Session controller, config, checkpoints
//!
//! # Critical Invariants
//!
//! 1. All balances and stakes are i64 whole credits
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Multiplier tables are a pure function of `(line_count, risk)`

// Module declarations
pub mod board;
pub mod core;
pub mod events;
pub mod models;
pub mod payout;
pub mod rng;
pub mod session;
pub mod simulation;

// Re-exports for convenience
pub use board::{BoardCatalog, BoardConfig, BoardController, BoardError, DisplayBand};
pub use core::time::TickClock;
pub use events::{EventBus, EventSubscriber};
pub use models::{EventLog, GameEvent, Ledger, LedgerError};
pub use payout::{generate, MultiplierTable, RiskTier, TableError};
pub use rng::RngManager;
pub use session::{
    BetReceipt, BetSizer, SessionConfig, SessionController, SessionError, SessionSnapshot,
    SessionState, TickResult,
};
pub use simulation::{HandleId, PoolConfig, PoolGrowth, SimulationPool};
