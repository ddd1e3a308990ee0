//! Demo-mode bot
//!
//! Plays the game through the same commands a human would issue. Used for the
//! attract screen in the browser and for headless runs on native.

use super::state::{Command, GamePhase, GameState, Obstacle};

/// Pick the command the bot would issue before the next step
pub fn decide(state: &GameState) -> Option<Command> {
    match state.phase {
        GamePhase::Waiting | GamePhase::GameOver => Some(Command::Start),
        GamePhase::Paused => None,
        GamePhase::Playing => {
            if state.player.jumping {
                return None;
            }
            let threat = next_threat(state)?;
            let steps = steps_until_aligned(state, threat);
            // Time the apex of the jump over the obstacle's center
            (steps <= apex_steps(state)).then_some(Command::Jump)
        }
    }
}

/// Nearest obstacle whose right edge is still ahead of the player's left edge
fn next_threat(state: &GameState) -> Option<&Obstacle> {
    let player_left = state.player.pos.x;
    state
        .obstacles
        .iter()
        .filter(|o| o.right_edge() > player_left)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
}

/// Steps until the obstacle's center passes the player's center
fn steps_until_aligned(state: &GameState, obstacle: &Obstacle) -> f32 {
    let player_center = state.player.pos.x + state.player.width / 2.0;
    let obstacle_center = obstacle.pos.x + obstacle.width / 2.0;
    (obstacle_center - player_center) / state.speed.max(f32::EPSILON)
}

/// Steps from takeoff to the top of the arc
fn apex_steps(state: &GameState) -> f32 {
    -state.tuning.jump_velocity / state.tuning.gravity
}
