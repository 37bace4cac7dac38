//! Ball trajectories
//!
//! The engine treats ball motion as a black box with one contract: stepped
//! once per tick, it eventually reports `Landed(slot)` for exactly one slot.
//! `PegWalk` is the built-in model: the ball drops one peg row every
//! `ticks_per_row` ticks and bounces left or right off each row.

use crate::rng::RngManager;
use crate::simulation::pool::BallPosition;

/// Result of advancing a trajectory by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    StillMoving,
    Landed(usize),
}

/// One in-flight ball's motion
pub trait Trajectory {
    /// Advance one tick. Once landed, keeps returning the same `Landed`.
    fn step(&mut self) -> StepOutcome;

    fn position(&self) -> BallPosition;
}

/// Creates a trajectory for each dispatched ball
///
/// Randomness comes from the session's RNG so a checkpoint only has to
/// capture one generator state.
pub trait TrajectoryLauncher {
    fn launch(&mut self, line_count: usize, rng: &mut RngManager) -> Box<dyn Trajectory>;
}

/// Peg-by-peg random walk
///
/// Deflections are drawn at launch; stepping consumes no randomness.
#[derive(Debug, Clone)]
pub struct PegWalk {
    deflections: Vec<bool>,
    ticks_per_row: u32,
    ticks_in_row: u32,
    position: BallPosition,
}

impl PegWalk {
    /// `deflections[row]` is true when the ball bounces right off that row
    pub fn new(deflections: Vec<bool>, ticks_per_row: u32) -> Self {
        assert!(ticks_per_row > 0, "ticks_per_row must be positive");
        Self {
            deflections,
            ticks_per_row,
            ticks_in_row: 0,
            position: BallPosition::default(),
        }
    }

    pub fn random(line_count: usize, ticks_per_row: u32, rng: &mut RngManager) -> Self {
        let deflections = (0..line_count).map(|_| rng.coin_flip()).collect();
        Self::new(deflections, ticks_per_row)
    }

    /// Slot this walk will land in
    pub fn destination(&self) -> usize {
        self.deflections.iter().filter(|&&right| right).count()
    }

    fn has_landed(&self) -> bool {
        self.position.row >= self.deflections.len()
    }
}

impl Trajectory for PegWalk {
    fn step(&mut self) -> StepOutcome {
        if !self.has_landed() {
            self.ticks_in_row += 1;
            if self.ticks_in_row >= self.ticks_per_row {
                self.ticks_in_row = 0;
                if self.deflections[self.position.row] {
                    self.position.column += 1;
                }
                self.position.row += 1;
            }
        }

        if self.has_landed() {
            StepOutcome::Landed(self.position.column)
        } else {
            StepOutcome::StillMoving
        }
    }

    fn position(&self) -> BallPosition {
        self.position
    }
}

/// Default launcher producing `PegWalk`s
#[derive(Debug, Clone)]
pub struct PegWalkLauncher {
    ticks_per_row: u32,
}

impl PegWalkLauncher {
    pub fn new(ticks_per_row: u32) -> Self {
        assert!(ticks_per_row > 0, "ticks_per_row must be positive");
        Self { ticks_per_row }
    }
}

impl TrajectoryLauncher for PegWalkLauncher {
    fn launch(&mut self, line_count: usize, rng: &mut RngManager) -> Box<dyn Trajectory> {
        Box::new(PegWalk::random(line_count, self.ticks_per_row, rng))
    }
}
