//! Domain models for the payout engine

pub mod event;
pub mod ledger;

// Re-exports
pub use event::{EventLog, GameEvent};
pub use ledger::{Ledger, LedgerError};
