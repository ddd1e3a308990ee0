//! Simulation core
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM,
//! the GPU or storage:
//! - One discrete step per call, no wall clock
//! - Spawn randomness injected by the caller
//! - Notifications queued as events for the shell to drain

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, aabb_overlap};
pub use state::{
    Command, Difficulty, GameEvent, GamePhase, GameState, Obstacle, Player, UnknownDifficulty,
};
pub use tick::{Simulation, step, target_speed};
