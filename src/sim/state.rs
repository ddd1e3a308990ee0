//! Game state and core simulation types
//!
//! The simulation owns every mutable field below. Renderers and the HUD only
//! ever see a shared borrow of [`GameState`].

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh load, waiting for the first start
    #[default]
    Waiting,
    /// Active gameplay
    Playing,
    /// Stepping suspended, state frozen
    Paused,
    /// Run ended on a collision
    GameOver,
}

/// Difficulty mode, fixes the base scroll speed for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Scroll speed at the start of a run (pixels per step)
    pub fn base_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Normal => 4.0,
            Difficulty::Hard => 6.0,
        }
    }
}

/// Difficulty name that matched no mode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    /// Case-insensitive; "medium" is accepted for Normal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "medium" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// Notifications raised by the simulation, drained by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A jump impulse was applied
    Jumped,
    /// Displayed score crossed a multiple of the milestone interval
    Milestone(u32),
    /// Run ended with a score above the previous best; persist it
    NewBest { score: u32 },
    /// Run ended on a collision
    GameOver { score: u32 },
}

/// Abstract commands produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Jump,
    Crouch(bool),
    Pause,
    Resume,
    Reset,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the standing pose
    pub pos: Vec2,
    pub width: f32,
    /// Current hitbox height (shrinks while crouching)
    pub height: f32,
    /// Height restored when the crouch ends
    pub stand_height: f32,
    pub velocity_y: f32,
    pub jumping: bool,
    pub crouching: bool,
    /// Cycles through [0, 2); floor selects the leg frame
    pub animation_phase: f32,
}

impl Player {
    /// Default pose standing on the ground line
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_x, tuning.ground_y),
            width: tuning.player_width,
            height: tuning.player_height,
            stand_height: tuning.player_height,
            velocity_y: 0.0,
            jumping: false,
            crouching: false,
            animation_phase: 0.0,
        }
    }

    /// Collision box: the top-left stays put, crouching only trims the bottom
    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Leg frame (0 or 1) for the two-frame run cycle
    pub fn leg_frame(&self) -> u8 {
        if self.animation_phase.floor() as u8 == 0 {
            0
        } else {
            1
        }
    }
}

/// A cactus scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Scroll speed when spawned (informational, not re-read)
    pub speed: f32,
}

impl Obstacle {
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance constants for this variant
    pub tuning: Tuning,
    /// Difficulty for the current/next run
    pub difficulty: Difficulty,
    /// Current phase
    pub phase: GamePhase,
    /// Seed of the current run's spawn RNG
    pub seed: u64,
    pub player: Player,
    /// Live obstacles in spawn order (last is the most recent)
    pub obstacles: Vec<Obstacle>,
    /// Fractional score accumulator
    pub score_acc: f64,
    /// Displayed score, floor of the accumulator
    pub score: u32,
    /// Best score across runs
    pub best_score: u32,
    /// Current scroll speed (pixels per step)
    pub speed: f32,
    /// Last milestone announced this run
    pub last_milestone: u32,
    /// Steps taken this run
    pub time_ticks: u64,
    /// Total ground scrolled this run, drives the ground pattern
    pub distance: f32,
    /// Pending notifications
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(tuning: Tuning, difficulty: Difficulty, best_score: u32) -> Self {
        let speed = difficulty.base_speed().min(tuning.max_speed);
        Self {
            player: Player::new(&tuning),
            tuning,
            difficulty,
            phase: GamePhase::Waiting,
            seed: 0,
            obstacles: Vec::new(),
            score_acc: 0.0,
            score: 0,
            best_score,
            speed,
            last_milestone: 0,
            time_ticks: 0,
            distance: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// True while a run is in progress (playing or paused)
    pub fn run_active(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    /// Change difficulty; refused while a run is in progress
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.run_active() {
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    /// Dispatch a command; returns whether it changed anything
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Jump => self.jump(),
            Command::Crouch(active) => self.crouch(active),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Begin a run from Waiting or GameOver
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Waiting | GamePhase::GameOver) {
            return false;
        }
        self.clear_run();
        self.phase = GamePhase::Playing;
        log::info!(
            "Run started ({}, base speed {})",
            self.difficulty.as_str(),
            self.speed
        );
        true
    }

    /// Apply the jump impulse if grounded
    pub fn jump(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.player.jumping {
            return false;
        }
        self.player.velocity_y = self.tuning.jump_velocity;
        self.player.jumping = true;
        self.events.push(GameEvent::Jumped);
        true
    }

    /// Enter or leave the crouch pose
    pub fn crouch(&mut self, active: bool) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.player.crouching = active;
        self.player.height = if active {
            self.tuning.crouch_height
        } else {
            self.player.stand_height
        };
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Back to a fresh load; best score and difficulty survive
    pub fn reset(&mut self) {
        self.clear_run();
        self.phase = GamePhase::Waiting;
        self.events.clear();
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn clear_run(&mut self) {
        self.player = Player::new(&self.tuning);
        self.obstacles.clear();
        self.score_acc = 0.0;
        self.score = 0;
        self.last_milestone = 0;
        self.time_ticks = 0;
        self.distance = 0.0;
        self.speed = self.difficulty.base_speed().min(self.tuning.max_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> GameState {
        GameState::new(Tuning::default(), Difficulty::Normal, 0)
    }

    #[test]
    fn test_transitions_from_waiting() {
        let mut state = fresh();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert!(!state.pause());
        assert!(!state.resume());
        assert!(!state.jump());
        assert!(!state.crouch(true));
        assert_eq!(state.phase, GamePhase::Waiting);
        assert!(state.start());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_start_only_from_waiting_or_game_over() {
        let mut state = fresh();
        state.start();
        assert!(!state.start());
        state.pause();
        assert!(!state.start());
        assert_eq!(state.phase, GamePhase::Paused);
        state.phase = GamePhase::GameOver;
        assert!(state.start());
    }

    #[test]
    fn test_start_resets_run() {
        let mut state = fresh();
        state.start();
        state.score_acc = 42.5;
        state.score = 42;
        state.speed = 9.0;
        state.player.pos.y = 100.0;
        state.obstacles.push(Obstacle {
            id: 7,
            pos: Vec2::new(300.0, 210.0),
            width: 17.0,
            height: 35.0,
            speed: 9.0,
        });
        state.phase = GamePhase::GameOver;

        assert!(state.start());
        assert_eq!(state.score, 0);
        assert_eq!(state.score_acc, 0.0);
        assert_eq!(state.speed, 4.0);
        assert_eq!(state.player.pos.y, 240.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_double_jump_is_ignored() {
        let mut state = fresh();
        state.start();
        assert!(state.jump());
        let velocity = state.player.velocity_y;
        assert!(!state.jump());
        assert!(state.player.jumping);
        assert_eq!(state.player.velocity_y, velocity);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_crouch_keeps_hitbox_top() {
        let mut state = fresh();
        state.start();
        let standing = state.player.hitbox();
        assert!(state.crouch(true));
        let crouched = state.player.hitbox();
        assert_eq!(crouched.size.y, 26.0);
        assert_eq!(crouched.top(), standing.top());
        assert_eq!(crouched.bottom(), 266.0);
        state.crouch(false);
        assert_eq!(state.player.hitbox(), standing);
    }

    #[test]
    fn test_pause_resume_roundtrip() {
        let mut state = fresh();
        state.start();
        assert!(state.pause());
        assert!(!state.pause());
        assert!(!state.jump());
        assert!(state.resume());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_keeps_best_score() {
        let mut state = GameState::new(Tuning::default(), Difficulty::Hard, 321);
        state.start();
        state.score = 50;
        state.reset();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.best_score, 321);
        assert_eq!(state.score, 0);
        assert_eq!(state.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_locked_during_run() {
        let mut state = fresh();
        assert!(state.set_difficulty(Difficulty::Easy));
        state.start();
        assert_eq!(state.speed, 3.0);
        assert!(!state.set_difficulty(Difficulty::Hard));
        state.pause();
        assert!(!state.set_difficulty(Difficulty::Hard));
        assert_eq!(state.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Normal));
        assert_eq!(
            "nightmare".parse::<Difficulty>(),
            Err(UnknownDifficulty("nightmare".to_string()))
        );
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(difficulty.as_str().parse::<Difficulty>(), Ok(difficulty));
        }
    }
}
