//! Session controller
//!
//! Main game loop tying the components together:
//! - Bet validation and stake debit (ledger)
//! - Ball dispatch (pool + trajectory launcher)
//! - Per-tick trajectory stepping
//! - Landing resolution and payout credit (board)
//! - Round finalization and event delivery (event log + bus)
//!
//! # Tick Loop
//!
//! ```text
//! For each tick t:
//! 1. Advance the clock
//! 2. Step every in-flight ball, ascending handle order
//! 3. For each ball that landed this tick:
//!    a. Resolve the slot multiplier
//!    b. Credit round(stake × multiplier)
//!    c. Emit BallSettled, CoefficientWon (m > 1), BigWin (m ≥ threshold)
//!    d. Release the handle
//! 4. If the pool drained: emit RoundResolved, GamePlayed, GameLost?, RoundSummary
//! ```
//!
//! # Critical Invariants
//!
//! 1. Balance conservation: `balance = opening - Σ stakes - Σ unlocks + Σ payouts`
//! 2. Active balls never exceed `max_concurrent_balls`
//! 3. A rejected bet changes nothing (no debit, no handle, no event)
//! 4. Each dispatched ball settles or is abandoned exactly once
//! 5. The board's table changes only while no ball is in flight
//!
//! # Example
//!
//! ```
//! use plinko_payout_core::session::{SessionConfig, SessionController, SessionState};
//!
//! let mut session = SessionController::new(SessionConfig::default()).unwrap();
//! session.place_bet(10).unwrap();
//! assert_eq!(session.balance(), 990);
//!
//! session.run_until_idle(1_000).unwrap();
//! assert_eq!(session.state(), SessionState::Idle);
//! assert_eq!(session.active_balls(), 0);
//! ```

use crate::board::{BoardCatalog, BoardController};
use crate::core::time::TickClock;
use crate::events::{EventBus, EventSubscriber};
use crate::models::{EventLog, GameEvent, Ledger};
use crate::payout::RiskTier;
use crate::rng::RngManager;
use crate::session::checkpoint::{compute_config_hash, SessionSnapshot};
use crate::session::config::SessionConfig;
use crate::session::error::SessionError;
use crate::simulation::{
    HandleId, PegWalkLauncher, ReleaseOutcome, SimulationPool, StepOutcome, Trajectory,
    TrajectoryLauncher,
};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Where the session is in the bet / fly / settle cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No balls in flight
    Idle,
    /// Stake debited, ball being dispatched
    BetPlaced,
    /// At least one ball falling
    BallsInFlight,
    /// Last ball landed, round being finalized
    Settling,
}

/// Accepted bet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetReceipt {
    pub handle: HandleId,
    pub stake: i64,
    pub risk: RiskTier,
    pub line_count: usize,
    /// Balls in flight including this one
    pub active_balls: usize,
    pub balance_after: i64,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub tick: u64,
    /// Balls that landed this tick
    pub settled: usize,
    /// Balls still falling after this tick
    pub in_flight: usize,
    /// This tick closed the round
    pub round_resolved: bool,
}

struct InFlightBall {
    stake: i64,
    trajectory: Box<dyn Trajectory>,
}

/// Running totals for the current round
#[derive(Debug, Default)]
struct RoundTally {
    stake: i64,
    payout: i64,
    balls: usize,
    won: bool,
}

/// One player's game session
pub struct SessionController {
    session_id: Uuid,
    config: SessionConfig,
    state: SessionState,
    ledger: Ledger,
    board: BoardController,
    catalog: BoardCatalog,
    pool: SimulationPool,
    launcher: Box<dyn TrajectoryLauncher>,
    rng: RngManager,
    clock: TickClock,
    /// Keyed by handle so iteration is ascending handle order
    in_flight: BTreeMap<HandleId, InFlightBall>,
    round: RoundTally,
    event_log: EventLog,
    bus: EventBus,
}

impl SessionController {
    /// Create a session using peg-walk trajectories
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let launcher = Box::new(PegWalkLauncher::new(config.ticks_per_row));
        Self::with_launcher(config, launcher)
    }

    /// Create a session with a custom trajectory source
    pub fn with_launcher(
        config: SessionConfig,
        launcher: Box<dyn TrajectoryLauncher>,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let board = BoardController::new(
            config.default_line_count + 1,
            config.default_risk,
            config.band_thresholds,
        )?;
        let session_id = Uuid::new_v4();

        info!(
            %session_id,
            seed = config.rng_seed,
            line_count = config.default_line_count,
            risk = %config.default_risk,
            "session created"
        );

        Ok(Self {
            session_id,
            state: SessionState::Idle,
            ledger: Ledger::new(config.opening_balance),
            board,
            catalog: BoardCatalog::new(config.boards.clone()),
            pool: SimulationPool::new(config.pool.clone()),
            launcher,
            rng: RngManager::new(config.rng_seed),
            clock: TickClock::new(),
            in_flight: BTreeMap::new(),
            round: RoundTally::default(),
            event_log: EventLog::new(),
            bus: EventBus::new(),
            config,
        })
    }

    /// Register an out-of-core event subscriber
    pub fn subscribe<S>(&mut self, subscriber: S)
    where
        S: EventSubscriber + 'static,
    {
        self.bus.subscribe(Box::new(subscriber));
    }

    // ========================================================================
    // Betting
    // ========================================================================

    /// Debit `stake` and dispatch one ball
    ///
    /// Rejections leave balance, pool and event log untouched.
    pub fn place_bet(&mut self, stake: i64) -> Result<BetReceipt, SessionError> {
        if stake < self.config.min_stake {
            warn!(stake, min_stake = self.config.min_stake, "bet rejected: stake below minimum");
            return Err(SessionError::InvalidStake {
                stake,
                min_stake: self.config.min_stake,
            });
        }

        if self.in_flight.len() >= self.config.max_concurrent_balls {
            warn!(stake, limit = self.config.max_concurrent_balls, "bet rejected: concurrency limit");
            return Err(SessionError::ConcurrencyLimitExceeded {
                limit: self.config.max_concurrent_balls,
            });
        }

        if !self.ledger.has_enough(stake) {
            warn!(stake, balance = self.ledger.balance(), "bet rejected: insufficient balance");
            return Err(SessionError::InsufficientBalance {
                required: stake,
                available: self.ledger.balance(),
            });
        }

        if !self.pool.can_acquire() {
            warn!(stake, capacity = self.pool.total_created(), "bet rejected: no ball available");
            return Err(SessionError::BallUnavailable {
                capacity: self.pool.total_created(),
            });
        }

        let previous = self.state;
        self.ledger.debit(stake)?;
        self.state = SessionState::BetPlaced;

        let handle = match self.pool.acquire() {
            Ok(handle) => handle,
            Err(err) => {
                // can_acquire said yes; undo the debit before reporting
                self.ledger.credit(stake)?;
                self.state = previous;
                return Err(err.into());
            }
        };

        let trajectory = self.launcher.launch(self.board.line_count(), &mut self.rng);
        self.in_flight.insert(handle, InFlightBall { stake, trajectory });
        self.round.stake += stake;
        self.state = SessionState::BallsInFlight;

        let tick = self.clock.current_tick();
        let balance_after = self.ledger.balance();
        debug!(%handle, stake, balance_after, "ball dispatched");
        self.emit(GameEvent::BetPlaced {
            tick,
            handle,
            stake,
            balance_after,
        });

        Ok(BetReceipt {
            handle,
            stake,
            risk: self.board.risk_tier(),
            line_count: self.board.line_count(),
            active_balls: self.in_flight.len(),
            balance_after,
        })
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Advance one tick, settling every ball that lands on it
    pub fn tick(&mut self) -> Result<TickResult, SessionError> {
        self.clock.advance();
        let tick = self.clock.current_tick();

        let mut landings = Vec::new();
        for (handle, ball) in self.in_flight.iter_mut() {
            let outcome = ball.trajectory.step();
            self.pool.set_position(*handle, ball.trajectory.position());
            if let StepOutcome::Landed(slot) = outcome {
                landings.push((*handle, slot));
            }
        }

        let settled = landings.len();
        let mut round_resolved = false;
        for (handle, slot) in landings {
            round_resolved |= self.settle(handle, slot, tick)?;
        }

        Ok(TickResult {
            tick,
            settled,
            in_flight: self.in_flight.len(),
            round_resolved,
        })
    }

    /// Tick until no ball is in flight
    ///
    /// Returns the number of ticks taken.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> Result<u64, SessionError> {
        let mut ticks = 0;
        while !self.in_flight.is_empty() {
            if ticks >= max_ticks {
                warn!(max_ticks, in_flight = self.in_flight.len(), "simulation stalled");
                return Err(SessionError::SimulationStalled { ticks: max_ticks });
            }
            self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Credit one landed ball; true when it closed the round
    fn settle(&mut self, handle: HandleId, slot: usize, tick: u64) -> Result<bool, SessionError> {
        let hit = self.board.resolve_arrival(slot).map_err(|err| {
            error!(%handle, slot, slot_count = self.board.slot_count(), "ball landed off the board");
            SessionError::InvariantViolation(format!("{} landed outside the board: {}", handle, err))
        })?;

        let ball = self.in_flight.remove(&handle).ok_or_else(|| {
            error!(%handle, "landing for a ball that is not in flight");
            SessionError::InvariantViolation(format!("{} is not in flight", handle))
        })?;

        let raw_payout = ball.stake as f64 * hit.multiplier;
        let payout = whole_payout(raw_payout).ok_or_else(|| {
            error!(%handle, stake = ball.stake, multiplier = hit.multiplier, "payout out of range");
            SessionError::InvariantViolation(format!(
                "{} payout {} does not fit in i64",
                handle, raw_payout
            ))
        })?;
        self.ledger.credit(payout).map_err(|err| {
            error!(%handle, payout, balance = self.ledger.balance(), "payout credit refused");
            SessionError::from(err)
        })?;

        self.round.payout += payout;
        self.round.balls += 1;
        self.round.won |= hit.multiplier > 1.0;

        debug!(%handle, slot = hit.index, multiplier = hit.multiplier, payout, "ball landed");

        self.emit(GameEvent::BallSettled {
            tick,
            handle,
            slot_index: hit.index,
            multiplier: hit.multiplier,
            payout,
            hit_ceiling: hit.multiplier >= self.board.highest_possible_multiplier(),
        });
        if hit.multiplier > 1.0 {
            self.emit(GameEvent::CoefficientWon {
                tick,
                multiplier: hit.multiplier,
                payout: raw_payout,
            });
        }
        if hit.multiplier >= self.config.big_win_threshold {
            self.emit(GameEvent::BigWin {
                tick,
                multiplier: hit.multiplier,
                payout: raw_payout,
            });
        }

        match self.pool.release(handle) {
            ReleaseOutcome::Released => Ok(false),
            ReleaseOutcome::Drained => {
                self.finish_round(tick);
                Ok(true)
            }
            ReleaseOutcome::Ignored => {
                error!(%handle, "pool did not recognise a settling ball");
                Err(SessionError::InvariantViolation(format!(
                    "{} was not active in the pool",
                    handle
                )))
            }
        }
    }

    /// Force every in-flight ball back into the pool
    ///
    /// Abandoned balls pay nothing; their stakes stay debited. If a round
    /// was open it is finalized. Returns the number of balls abandoned.
    pub fn return_all_balls(&mut self) -> usize {
        if self.in_flight.is_empty() {
            return 0;
        }

        let tick = self.clock.current_tick();
        let released = self.pool.release_all();
        let abandoned = released.len();

        for handle in released {
            if let Some(ball) = self.in_flight.remove(&handle) {
                self.round.balls += 1;
                self.emit(GameEvent::BallAbandoned {
                    tick,
                    handle,
                    stake: ball.stake,
                });
            }
        }
        self.in_flight.clear();

        warn!(abandoned, "in-flight balls force-returned");
        self.finish_round(tick);
        abandoned
    }

    fn finish_round(&mut self, tick: u64) {
        self.state = SessionState::Settling;
        let round = std::mem::take(&mut self.round);

        let multiplier = if round.stake > 0 {
            round.payout as f64 / round.stake as f64
        } else {
            0.0
        };
        let net_profit = round.payout - round.stake;

        info!(
            balls = round.balls,
            stake = round.stake,
            payout = round.payout,
            net_profit,
            balance = self.ledger.balance(),
            "round resolved"
        );

        self.emit(GameEvent::RoundResolved {
            tick,
            won: round.won,
            balls: round.balls,
        });
        self.emit(GameEvent::GamePlayed { tick });
        if !round.won {
            self.emit(GameEvent::GameLost { tick });
        }
        self.emit(GameEvent::RoundSummary {
            tick,
            stake: round.stake,
            multiplier,
            net_profit,
        });

        self.state = SessionState::Idle;
    }

    // ========================================================================
    // Board management
    // ========================================================================

    /// Switch risk tier; only between rounds
    pub fn set_risk_tier(&mut self, risk: RiskTier) -> Result<(), SessionError> {
        self.ensure_no_balls_in_flight()?;
        self.board.set_risk_tier(risk)?;

        let highest_multiplier = self.board.highest_possible_multiplier();
        info!(%risk, highest_multiplier, "risk tier changed");
        self.emit(GameEvent::RiskTierChanged {
            tick: self.clock.current_tick(),
            risk,
            highest_multiplier,
        });
        Ok(())
    }

    /// Switch to another unlocked board width; only between rounds
    pub fn select_board(&mut self, line_count: usize) -> Result<(), SessionError> {
        let config = self
            .catalog
            .get(line_count)
            .ok_or(SessionError::UnknownBoard { line_count })?;
        if !self.catalog.is_unlocked(line_count) {
            return Err(SessionError::BoardLocked {
                line_count,
                unlock_price: config.unlock_price,
            });
        }
        self.ensure_no_balls_in_flight()?;

        self.board = BoardController::new(
            line_count + 1,
            self.board.risk_tier(),
            self.config.band_thresholds,
        )?;

        info!(line_count, "board selected");
        self.emit(GameEvent::BoardSelected {
            tick: self.clock.current_tick(),
            line_count,
        });
        Ok(())
    }

    /// Buy a locked board
    ///
    /// Returns false (and charges nothing) if it was already unlocked.
    pub fn unlock_board(&mut self, line_count: usize) -> Result<bool, SessionError> {
        let price = self
            .catalog
            .get(line_count)
            .ok_or(SessionError::UnknownBoard { line_count })?
            .unlock_price;
        if self.catalog.is_unlocked(line_count) {
            return Ok(false);
        }

        if !self.ledger.has_enough(price) {
            warn!(line_count, price, balance = self.ledger.balance(), "unlock rejected: insufficient balance");
            return Err(SessionError::InsufficientBalance {
                required: price,
                available: self.ledger.balance(),
            });
        }
        if price > 0 {
            self.ledger.debit(price)?;
        }
        self.catalog.unlock(line_count);

        info!(line_count, price, balance = self.ledger.balance(), "board unlocked");
        self.emit(GameEvent::BoardUnlocked {
            tick: self.clock.current_tick(),
            line_count,
            price,
        });
        Ok(true)
    }

    fn ensure_no_balls_in_flight(&self) -> Result<(), SessionError> {
        if self.in_flight.is_empty() {
            Ok(())
        } else {
            Err(SessionError::RoundInProgress {
                in_flight: self.in_flight.len(),
            })
        }
    }

    // ========================================================================
    // Checkpointing
    // ========================================================================

    /// Capture the session between rounds
    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.ensure_no_balls_in_flight()?;

        Ok(SessionSnapshot {
            session_id: self.session_id,
            tick: self.clock.current_tick(),
            ledger: self.ledger.clone(),
            risk: self.board.risk_tier(),
            line_count: self.board.line_count(),
            unlocked_boards: self.catalog.unlocked().collect(),
            rng_state: self.rng.get_state(),
            pool: self.pool.snapshot()?,
            config_hash: compute_config_hash(&self.config)?,
        })
    }

    /// Resume a snapshotted session with peg-walk trajectories
    pub fn restore(config: SessionConfig, snapshot: &SessionSnapshot) -> Result<Self, SessionError> {
        config.validate()?;
        let launcher = Box::new(PegWalkLauncher::new(config.ticks_per_row));
        Self::restore_with_launcher(config, snapshot, launcher)
    }

    /// Resume a snapshotted session
    ///
    /// Fails with `ConfigMismatch` unless `config` hashes to the value
    /// recorded in the snapshot.
    pub fn restore_with_launcher(
        config: SessionConfig,
        snapshot: &SessionSnapshot,
        launcher: Box<dyn TrajectoryLauncher>,
    ) -> Result<Self, SessionError> {
        let actual = compute_config_hash(&config)?;
        if actual != snapshot.config_hash {
            return Err(SessionError::ConfigMismatch {
                expected: snapshot.config_hash.clone(),
                actual,
            });
        }

        let mut session = Self::with_launcher(config, launcher)?;

        for &line_count in &snapshot.unlocked_boards {
            if session.catalog.get(line_count).is_none() {
                return Err(SessionError::UnknownBoard { line_count });
            }
            session.catalog.unlock(line_count);
        }
        if !session.catalog.is_unlocked(snapshot.line_count) {
            return Err(SessionError::InvalidConfig(format!(
                "snapshot board ({} lines) is not unlocked",
                snapshot.line_count
            )));
        }

        session.board = BoardController::new(
            snapshot.line_count + 1,
            snapshot.risk,
            session.config.band_thresholds,
        )?;
        session.session_id = snapshot.session_id;
        session.ledger = snapshot.ledger.clone();
        session.clock = TickClock::starting_at(snapshot.tick);
        session.rng = RngManager::new(snapshot.rng_state);
        session.pool = SimulationPool::restore(session.config.pool.growth, &snapshot.pool)?;

        info!(
            session_id = %session.session_id,
            tick = snapshot.tick,
            balance = session.ledger.balance(),
            "session restored"
        );
        Ok(session)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Balls currently in flight
    pub fn active_balls(&self) -> usize {
        self.in_flight.len()
    }

    pub fn board(&self) -> &BoardController {
        &self.board
    }

    pub fn catalog(&self) -> &BoardCatalog {
        &self.catalog
    }

    pub fn pool(&self) -> &SimulationPool {
        &self.pool
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.current_tick()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Log an event, then deliver it to subscribers
    fn emit(&mut self, event: GameEvent) {
        self.event_log.log(event.clone());
        self.bus.publish(&event);
    }
}

/// Round half away from zero into whole credits; `None` if out of range
fn whole_payout(raw: f64) -> Option<i64> {
    let rounded = raw.round();
    // i64::MAX as f64 is 2^63, one past the largest i64
    (rounded.is_finite() && rounded >= 0.0 && rounded < i64::MAX as f64).then_some(rounded as i64)
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("balance", &self.ledger.balance())
            .field("line_count", &self.board.line_count())
            .field("risk", &self.board.risk_tier())
            .field("in_flight", &self.in_flight.len())
            .field("tick", &self.clock.current_tick())
            .finish()
    }
}
