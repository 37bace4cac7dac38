//! Session error taxonomy
//!
//! Per-bet failures (`InsufficientBalance`, `ConcurrencyLimitExceeded`,
//! `BallUnavailable`, `InvalidStake`) leave the session exactly as it was.
//! `InvariantViolation` means the engine's own bookkeeping is broken; the
//! session should be discarded rather than retried.

use crate::board::BoardError;
use crate::models::LedgerError;
use crate::payout::TableError;
use crate::simulation::PoolError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("Concurrency limit exceeded: {limit} balls already in flight")]
    ConcurrencyLimitExceeded { limit: usize },

    #[error("No ball available: all {capacity} pooled handles are in flight")]
    BallUnavailable { capacity: usize },

    #[error("Invalid board configuration: line_count {line_count}")]
    InvalidBoardConfiguration { line_count: usize },

    #[error("Invalid stake {stake}: minimum is {min_stake}")]
    InvalidStake { stake: i64, min_stake: i64 },

    #[error("Round in progress: {in_flight} balls still in flight")]
    RoundInProgress { in_flight: usize },

    #[error("Unknown board: {line_count} lines is not in the catalog")]
    UnknownBoard { line_count: usize },

    #[error("Board with {line_count} lines is locked (unlock price {unlock_price})")]
    BoardLocked { line_count: usize, unlock_price: i64 },

    #[error("Engine invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Simulation did not settle within {ticks} ticks")]
    SimulationStalled { ticks: u64 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config mismatch: snapshot was taken with config {expected}, got {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<LedgerError> for SessionError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { required, available } => {
                SessionError::InsufficientBalance { required, available }
            }
            LedgerError::NonPositiveAmount { amount } => {
                SessionError::InvariantViolation(format!("ledger refused amount {}", amount))
            }
            LedgerError::Overflow { .. } => SessionError::InvariantViolation(err.to_string()),
        }
    }
}

impl From<TableError> for SessionError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::InvalidBoardConfiguration { line_count } => {
                SessionError::InvalidBoardConfiguration { line_count }
            }
        }
    }
}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::Table(table) => table.into(),
            BoardError::SlotOutOfRange { .. } => SessionError::InvariantViolation(err.to_string()),
        }
    }
}

impl From<PoolError> for SessionError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Exhausted { capacity } => SessionError::BallUnavailable { capacity },
            PoolError::HandlesActive { active } => SessionError::RoundInProgress { in_flight: active },
            PoolError::InvalidSnapshot(reason) => SessionError::InvalidSnapshot(reason),
            PoolError::ActiveOnFreeStack { .. } => SessionError::InvariantViolation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}
