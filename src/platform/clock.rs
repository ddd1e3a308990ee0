//! Fixed-step scheduling
//!
//! The display refresh callback hands us timestamps; the clock turns elapsed
//! time into a whole number of simulation steps. Pending time is discarded
//! whenever the run is not playing, so a step can never fire after a pause,
//! game over or reset.

use rand::Rng;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GamePhase, Simulation};

/// Longest frame gap honoured (tab switches report huge deltas)
const MAX_FRAME_GAP: f64 = 0.1;

/// Refresh timestamps at exactly 60 Hz land within float error of one step
const STEP_EPSILON: f64 = 1e-6;

/// Accumulates wall-clock time into fixed simulation steps
#[derive(Debug, Clone)]
pub struct StepClock {
    step_dt: f64,
    max_substeps: u32,
    accumulator: f64,
    last_time_ms: Option<f64>,
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new(SIM_DT as f64, MAX_SUBSTEPS)
    }
}

impl StepClock {
    pub fn new(step_dt: f64, max_substeps: u32) -> Self {
        Self {
            step_dt,
            max_substeps,
            accumulator: 0.0,
            last_time_ms: None,
        }
    }

    /// Record a refresh timestamp (ms) and return how many steps are due.
    /// While not `armed` nothing accumulates.
    pub fn advance(&mut self, now_ms: f64, armed: bool) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_GAP),
            None => self.step_dt,
        };
        self.last_time_ms = Some(now_ms);

        if !armed {
            self.cancel();
            return 0;
        }

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator + STEP_EPSILON >= self.step_dt && steps < self.max_substeps {
            self.accumulator = (self.accumulator - self.step_dt).max(0.0);
            steps += 1;
        }
        if steps == self.max_substeps {
            // Spiral of death: drop the backlog instead of chasing it
            self.accumulator = self.accumulator.min(self.step_dt);
        }
        steps
    }

    /// Drop any pending time
    pub fn cancel(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step_dt).clamp(0.0, 1.0) as f32
    }

    /// Run every due step, stopping early if a step ends the run
    pub fn pump<R: Rng>(&mut self, now_ms: f64, sim: &mut Simulation<R>) -> u32 {
        let due = self.advance(now_ms, sim.phase() == GamePhase::Playing);
        let mut ran = 0;
        for _ in 0..due {
            if sim.phase() != GamePhase::Playing {
                self.cancel();
                break;
            }
            sim.step();
            ran += 1;
        }
        if sim.phase() != GamePhase::Playing {
            self.cancel();
        }
        ran
    }
}
