//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so a variant (bigger canvas,
//! floatier jump) is a JSON file rather than a code change. Defaults reproduce
//! the classic 800x300 layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance constants for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Logical canvas width
    pub canvas_width: f32,
    /// Logical canvas height
    pub canvas_height: f32,
    /// Top of the standing player when grounded
    pub ground_y: f32,

    /// Downward acceleration added to velocity every step
    pub gravity: f32,
    /// Velocity applied on jump (negative is up)
    pub jump_velocity: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Hitbox height while crouching (feet stay on the ground)
    pub crouch_height: f32,
    /// Animation phase advance per step (phase wraps at 2)
    pub animation_step: f32,

    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Obstacle top sits this far above the ground line
    pub obstacle_lift: f32,
    /// Per-step spawn probability once the gate is open
    pub spawn_chance: f32,
    /// Most recent obstacle must scroll left of this x before another spawns
    pub spawn_gate_x: f32,

    /// Accumulator increment per surviving step
    pub score_per_step: f64,
    /// Milestone notification interval
    pub milestone_interval: u32,

    /// Extra speed per displayed point
    pub speed_per_point: f32,
    /// Score at which the flat boost kicks in
    pub boost_score: u32,
    /// Flat speed added once `boost_score` is reached
    pub boost_amount: f32,
    /// Hard cap on scroll speed
    pub max_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 300.0,
            ground_y: 240.0,

            gravity: 0.8,
            jump_velocity: -15.0,

            player_x: 100.0,
            player_width: 44.0,
            player_height: 47.0,
            crouch_height: 26.0,
            animation_step: 0.2,

            obstacle_width: 17.0,
            obstacle_height: 35.0,
            obstacle_lift: 30.0,
            spawn_chance: 0.008,
            spawn_gate_x: 500.0,

            score_per_step: 0.1,
            milestone_interval: 100,

            speed_per_point: 0.005,
            boost_score: 100,
            boost_amount: 1.0,
            max_speed: 12.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning file; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.gravity <= 0.0 {
            return Err(TuningError::Invalid {
                field: "gravity",
                reason: "must be positive or jumps never land",
            });
        }
        if self.jump_velocity >= 0.0 {
            return Err(TuningError::Invalid {
                field: "jump_velocity",
                reason: "must be negative (upward)",
            });
        }
        if self.crouch_height <= 0.0 || self.crouch_height > self.player_height {
            return Err(TuningError::Invalid {
                field: "crouch_height",
                reason: "must be in (0, player_height]",
            });
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(TuningError::Invalid {
                field: "spawn_chance",
                reason: "must be a probability",
            });
        }
        if self.milestone_interval == 0 {
            return Err(TuningError::Invalid {
                field: "milestone_interval",
                reason: "must be non-zero",
            });
        }
        if self.score_per_step <= 0.0 {
            return Err(TuningError::Invalid {
                field: "score_per_step",
                reason: "must be positive",
            });
        }
        if self.ground_y + self.player_height > self.canvas_height {
            return Err(TuningError::Invalid {
                field: "ground_y",
                reason: "player would stand below the canvas",
            });
        }
        Ok(())
    }

    /// Y coordinate of the drawn walking surface (player feet)
    pub fn floor_y(&self) -> f32 {
        self.ground_y + self.player_height
    }

    /// Spawn y of a fresh obstacle
    pub fn obstacle_y(&self) -> f32 {
        self.ground_y - self.obstacle_lift
    }
}
