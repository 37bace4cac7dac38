//! Session events
//!
//! Everything the engine tells the outside world (achievements, statistics,
//! balance display) goes through this enum. Every event carries the tick it
//! happened on.
//!
//! # Event Types
//!
//! - **Bet**: a stake was debited and a ball dispatched
//! - **Settlement**: a ball landed and was paid (per ball)
//! - **Round**: the last in-flight ball settled (per round)
//! - **Board**: risk tier, board selection and unlock changes
//!
//! # Ordering
//!
//! Settlements of different balls carry no mutual ordering guarantee beyond
//! "same tick, ascending handle". For one round the closing sequence is
//! always `RoundResolved`, `GamePlayed`, optional `GameLost`, `RoundSummary`.

use crate::payout::RiskTier;
use crate::simulation::HandleId;
use serde::{Deserialize, Serialize};

/// Event emitted by the session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Stake debited and a ball dispatched
    BetPlaced {
        tick: u64,
        handle: HandleId,
        stake: i64,
        balance_after: i64,
    },

    /// A ball landed and its payout was credited (every landing)
    BallSettled {
        tick: u64,
        handle: HandleId,
        slot_index: usize,
        multiplier: f64,
        payout: i64,
        /// Landed on the board's highest multiplier
        hit_ceiling: bool,
    },

    /// A ball landed on a multiplier above 1
    CoefficientWon {
        tick: u64,
        multiplier: f64,
        payout: f64,
    },

    /// A ball landed on a multiplier at or above the big-win threshold
    BigWin {
        tick: u64,
        multiplier: f64,
        payout: f64,
    },

    /// Ball force-returned to the pool without landing; pays nothing
    BallAbandoned {
        tick: u64,
        handle: HandleId,
        stake: i64,
    },

    /// Pool drained; the round is over
    RoundResolved {
        tick: u64,
        won: bool,
        balls: usize,
    },

    /// Fired once per fully resolved round
    GamePlayed { tick: u64 },

    /// Fired when a round resolves with no winning ball
    GameLost { tick: u64 },

    /// Per-round statistics line
    RoundSummary {
        tick: u64,
        stake: i64,
        multiplier: f64,
        net_profit: i64,
    },

    RiskTierChanged {
        tick: u64,
        risk: RiskTier,
        highest_multiplier: f64,
    },

    BoardSelected { tick: u64, line_count: usize },

    BoardUnlocked {
        tick: u64,
        line_count: usize,
        price: i64,
    },
}

impl GameEvent {
    /// Tick when this event occurred
    pub fn tick(&self) -> u64 {
        match self {
            GameEvent::BetPlaced { tick, .. }
            | GameEvent::BallSettled { tick, .. }
            | GameEvent::CoefficientWon { tick, .. }
            | GameEvent::BigWin { tick, .. }
            | GameEvent::BallAbandoned { tick, .. }
            | GameEvent::RoundResolved { tick, .. }
            | GameEvent::GamePlayed { tick }
            | GameEvent::GameLost { tick }
            | GameEvent::RoundSummary { tick, .. }
            | GameEvent::RiskTierChanged { tick, .. }
            | GameEvent::BoardSelected { tick, .. }
            | GameEvent::BoardUnlocked { tick, .. } => *tick,
        }
    }

    /// Short name of the event variant
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::BetPlaced { .. } => "BetPlaced",
            GameEvent::BallSettled { .. } => "BallSettled",
            GameEvent::CoefficientWon { .. } => "CoefficientWon",
            GameEvent::BigWin { .. } => "BigWin",
            GameEvent::BallAbandoned { .. } => "BallAbandoned",
            GameEvent::RoundResolved { .. } => "RoundResolved",
            GameEvent::GamePlayed { .. } => "GamePlayed",
            GameEvent::GameLost { .. } => "GameLost",
            GameEvent::RoundSummary { .. } => "RoundSummary",
            GameEvent::RiskTierChanged { .. } => "RiskTierChanged",
            GameEvent::BoardSelected { .. } => "BoardSelected",
            GameEvent::BoardUnlocked { .. } => "BoardUnlocked",
        }
    }

    /// Handle the event refers to, if it is a per-ball event
    pub fn handle(&self) -> Option<HandleId> {
        match self {
            GameEvent::BetPlaced { handle, .. }
            | GameEvent::BallSettled { handle, .. }
            | GameEvent::BallAbandoned { handle, .. } => Some(*handle),
            _ => None,
        }
    }
}

/// Append-only record of every event a session emitted
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn events_at_tick(&self, tick: u64) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_handle(&self, handle: HandleId) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.handle() == Some(handle))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tick_and_type() {
        let event = GameEvent::CoefficientWon {
            tick: 42,
            multiplier: 2.5,
            payout: 25.0,
        };

        assert_eq!(event.tick(), 42);
        assert_eq!(event.event_type(), "CoefficientWon");
        assert_eq!(event.handle(), None);
    }

    #[test]
    fn test_event_log_filters() {
        let mut log = EventLog::new();
        log.log(GameEvent::GamePlayed { tick: 1 });
        log.log(GameEvent::GameLost { tick: 1 });
        log.log(GameEvent::GamePlayed { tick: 2 });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at_tick(1).len(), 2);
        assert_eq!(log.events_of_type("GamePlayed").len(), 2);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = GameEvent::RoundSummary {
            tick: 7,
            stake: 10,
            multiplier: 2.5,
            net_profit: 15,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "RoundSummary");
        assert_eq!(json["net_profit"], 15);
    }
}
