//! Game session
//!
//! Ties the ledger, board, pool and trajectories into the bet / tick /
//! settle loop.

pub mod bet;
pub mod checkpoint;
pub mod config;
pub mod engine;
pub mod error;

pub use bet::BetSizer;
pub use checkpoint::{compute_config_hash, SessionSnapshot};
pub use config::{SessionConfig, MAX_CONCURRENT_BALLS};
pub use engine::{BetReceipt, SessionController, SessionState, TickResult};
pub use error::SessionError;
