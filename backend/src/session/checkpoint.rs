//! Session checkpoints
//!
//! A snapshot is only taken between rounds, so it never has to describe
//! balls in flight. It carries everything that influences future play:
//! ledger, board choice, unlocks, clock, RNG state and the pool's handle
//! generations and free-stack order.
//!
//! # Critical Invariants
//!
//! 1. Restoring with the same config and replaying the same commands
//!    produces the same event stream as the session that was snapshotted,
//!    handle ids included
//! 2. A snapshot only restores under the config it was taken with (hash check)

use crate::models::Ledger;
use crate::payout::RiskTier;
use crate::session::error::SessionError;
use crate::simulation::PoolSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Serializable session state between rounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub tick: u64,
    pub ledger: Ledger,
    pub risk: RiskTier,
    pub line_count: usize,
    pub unlocked_boards: Vec<usize>,
    pub rng_state: u64,
    pub pool: PoolSnapshot,
    /// SHA-256 of the canonical config JSON
    pub config_hash: String,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Hash a config deterministically
///
/// Object keys are sorted before hashing so two equal configs always
/// produce the same digest regardless of field order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SessionError> {
    let value = serde_json::to_value(config)?;
    let canonical = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
