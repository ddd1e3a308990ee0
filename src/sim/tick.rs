//! Per-step simulation
//!
//! One call to [`step`] advances a playing run by exactly one frame's worth of
//! physics. Spawn randomness comes from the caller so tests can script it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::aabb_overlap;
use super::state::{Command, GameEvent, GamePhase, GameState, Obstacle};
use crate::tuning::Tuning;

/// Advance a playing run by one step. No-op in any other phase.
pub fn step<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    // Gravity
    let player = &mut state.player;
    player.velocity_y += state.tuning.gravity;
    player.pos.y += player.velocity_y;

    // Ground clamp
    if player.pos.y >= state.tuning.ground_y {
        player.pos.y = state.tuning.ground_y;
        player.velocity_y = 0.0;
        player.jumping = false;
    }

    player.animation_phase = (player.animation_phase + state.tuning.animation_step) % 2.0;

    // Scroll and cull
    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
    }
    state.obstacles.retain(|o| o.right_edge() > 0.0);
    state.distance += speed;

    maybe_spawn(state, rng);

    // Collision freezes the run before any score is added
    let hitbox = state.player.hitbox();
    if state
        .obstacles
        .iter()
        .any(|o| aabb_overlap(&hitbox, &o.hitbox()))
    {
        end_run(state);
        return;
    }

    // Score and milestones
    state.score_acc += state.tuning.score_per_step;
    state.score = state.score_acc.floor() as u32;
    let interval = state.tuning.milestone_interval;
    let reached = state.score / interval * interval;
    while state.last_milestone < reached {
        state.last_milestone += interval;
        log::info!("Milestone {}", state.last_milestone);
        state.events.push(GameEvent::Milestone(state.last_milestone));
    }

    state.speed = target_speed(&state.tuning, state.difficulty.base_speed(), state.score)
        .max(state.speed)
        .min(state.tuning.max_speed);
}

/// Scroll speed for a displayed score, before the monotonic clamp
pub fn target_speed(tuning: &Tuning, base: f32, score: u32) -> f32 {
    let boost = if score >= tuning.boost_score {
        tuning.boost_amount
    } else {
        0.0
    };
    (base + score as f32 * tuning.speed_per_point + boost).min(tuning.max_speed)
}

/// Spawn gate plus per-step coin flip
fn maybe_spawn<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let gate_open = state
        .obstacles
        .last()
        .is_none_or(|o| o.pos.x < state.tuning.spawn_gate_x);
    if !gate_open {
        return;
    }
    if rng.random::<f32>() >= state.tuning.spawn_chance {
        return;
    }
    let id = state.next_entity_id();
    let tuning = &state.tuning;
    state.obstacles.push(Obstacle {
        id,
        pos: Vec2::new(tuning.canvas_width, tuning.obstacle_y()),
        width: tuning.obstacle_width,
        height: tuning.obstacle_height,
        speed: state.speed,
    });
}

fn end_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.score = state.score_acc.floor() as u32;
    if state.score > state.best_score {
        state.best_score = state.score;
        state.events.push(GameEvent::NewBest { score: state.score });
    }
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!(
        "Game over: score {} (best {}) after {} steps",
        state.score,
        state.best_score,
        state.time_ticks
    );
}

/// Game state bundled with the spawn RNG that drives it
pub struct Simulation<R = Pcg32> {
    pub state: GameState,
    rng: R,
}

impl Simulation<Pcg32> {
    pub fn new(state: GameState, seed: u64) -> Self {
        let mut sim = Self {
            state,
            rng: Pcg32::seed_from_u64(seed),
        };
        sim.state.seed = seed;
        sim
    }

    /// Start a run with a fresh spawn sequence
    pub fn start_seeded(&mut self, seed: u64) -> bool {
        if !self.state.start() {
            return false;
        }
        self.rng = Pcg32::seed_from_u64(seed);
        self.state.seed = seed;
        log::info!("Run seed: {}", seed);
        true
    }
}

impl<R: Rng> Simulation<R> {
    /// Use a caller-supplied random source
    pub fn with_rng(state: GameState, rng: R) -> Self {
        Self { state, rng }
    }

    pub fn step(&mut self) {
        step(&mut self.state, &mut self.rng);
    }

    pub fn apply(&mut self, command: Command) -> bool {
        self.state.apply(command)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Difficulty;
    use proptest::prelude::*;
    use rand::RngCore;

    /// RNG that always yields the same word; `u32::MAX` never spawns, `0` always does
    struct FixedRng(u32);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.0
        }

        fn next_u64(&mut self) -> u64 {
            ((self.0 as u64) << 32) | self.0 as u64
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 4];
            }
        }
    }

    fn never() -> FixedRng {
        FixedRng(u32::MAX)
    }

    fn always() -> FixedRng {
        FixedRng(0)
    }

    fn playing(difficulty: Difficulty) -> GameState {
        let mut state = GameState::new(Tuning::default(), difficulty, 0);
        state.start();
        state
    }

    fn cactus_at(state: &mut GameState, x: f32) {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, state.tuning.obstacle_y()),
            width: 17.0,
            height: 35.0,
            speed: state.speed,
        });
    }

    #[test]
    fn test_step_is_noop_unless_playing() {
        let mut state = GameState::new(Tuning::default(), Difficulty::Normal, 0);
        step(&mut state, &mut always());
        assert_eq!(state.time_ticks, 0);
        assert!(state.obstacles.is_empty());

        state.start();
        state.pause();
        let y = state.player.pos.y;
        step(&mut state, &mut always());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos.y, y);
        assert_eq!(state.score_acc, 0.0);
    }

    #[test]
    fn test_single_step_gravity_from_air() {
        let mut state = playing(Difficulty::Normal);
        state.player.pos.y = 200.0;
        step(&mut state, &mut never());
        assert_eq!(state.player.velocity_y, 0.8);
        assert!((state.player.pos.y - 200.8).abs() < 1e-4);
    }

    #[test]
    fn test_single_step_on_ground_stays_clamped() {
        let mut state = playing(Difficulty::Normal);
        step(&mut state, &mut never());
        assert_eq!(state.player.pos.y, 240.0);
        assert_eq!(state.player.velocity_y, 0.0);
        assert!(!state.player.jumping);
    }

    #[test]
    fn test_jump_lands_again() {
        let mut state = playing(Difficulty::Normal);
        assert!(state.jump());
        step(&mut state, &mut never());
        assert!(state.player.pos.y < 240.0);

        let mut landed_after = None;
        for i in 0..200 {
            step(&mut state, &mut never());
            if !state.player.jumping {
                landed_after = Some(i);
                break;
            }
        }
        assert!(landed_after.is_some());
        assert_eq!(state.player.pos.y, 240.0);
        assert!(state.jump());
    }

    #[test]
    fn test_animation_phase_wraps() {
        let mut state = playing(Difficulty::Normal);
        for _ in 0..25 {
            step(&mut state, &mut never());
            assert!((0.0..2.0).contains(&state.player.animation_phase));
        }
    }

    #[test]
    fn test_obstacle_culled_once_right_edge_passes_zero() {
        // Constant scroll speed for the whole crossing
        let tuning = Tuning {
            speed_per_point: 0.0,
            boost_amount: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, Difficulty::Normal, 0);
        state.start();
        // Park the runner out of the lane
        state.player.pos.x = -1000.0;
        cactus_at(&mut state, 800.0);
        let speed = state.speed;

        // Left edge reaches zero after ceil(800 / speed) steps but the body is still visible
        let to_left_edge = (800.0 / speed).ceil() as u32;
        for _ in 0..to_left_edge {
            step(&mut state, &mut never());
        }
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].pos.x, 0.0);

        // Dropped on the first step its right edge is no longer positive
        let to_right_edge = ((800.0 + 17.0) / speed).ceil() as u32;
        for _ in to_left_edge..to_right_edge - 1 {
            step(&mut state, &mut never());
        }
        assert_eq!(state.obstacles.len(), 1);
        step(&mut state, &mut never());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_gate_blocks_clustering() {
        let mut state = playing(Difficulty::Normal);
        state.player.pos.x = -1000.0;
        step(&mut state, &mut always());
        assert_eq!(state.obstacles.len(), 1);
        let first = state.obstacles[0].id;

        // Gate stays closed until the newest obstacle passes the gate line
        let steps_to_gate = ((800.0 - 500.0) / state.speed).floor() as usize;
        for _ in 0..steps_to_gate - 1 {
            step(&mut state, &mut always());
        }
        assert_eq!(state.obstacles.len(), 1);

        for _ in 0..3 {
            step(&mut state, &mut always());
        }
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.obstacles[0].id, first);
        assert!(state.obstacles[1].pos.x > state.obstacles[0].pos.x);
    }

    #[test]
    fn test_spawned_obstacle_records_speed() {
        let mut state = playing(Difficulty::Hard);
        step(&mut state, &mut always());
        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.speed, 6.0);
        assert_eq!(obstacle.pos.x, 800.0);
        assert_eq!(obstacle.pos.y, 210.0);
    }

    #[test]
    fn test_collision_ends_run_and_records_best() {
        let mut state = GameState::new(Tuning::default(), Difficulty::Normal, 3);
        state.start();
        state.score_acc = 12.7;
        state.score = 12;
        cactus_at(&mut state, 124.0);

        step(&mut state, &mut never());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 12);
        assert_eq!(state.score_acc, 12.7);
        assert_eq!(state.best_score, 12);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::NewBest { score: 12 },
                GameEvent::GameOver { score: 12 }
            ]
        );

        // Frozen afterwards
        let ticks = state.time_ticks;
        step(&mut state, &mut never());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_collision_below_best_keeps_best() {
        let mut state = GameState::new(Tuning::default(), Difficulty::Normal, 500);
        state.start();
        cactus_at(&mut state, 124.0);
        step(&mut state, &mut never());
        assert_eq!(state.best_score, 500);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_crouching_still_hits_cactus() {
        let mut state = playing(Difficulty::Normal);
        state.crouch(true);
        cactus_at(&mut state, 124.0);
        step(&mut state, &mut never());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_holding_crouch_ends_every_seeded_run() {
        for seed in 0..20 {
            let mut state = playing(Difficulty::Hard);
            let mut rng = Pcg32::seed_from_u64(seed);
            state.crouch(true);
            for _ in 0..20_000 {
                if state.phase != GamePhase::Playing {
                    break;
                }
                step(&mut state, &mut rng);
            }
            assert_eq!(state.phase, GamePhase::GameOver, "seed {} never crashed", seed);
            assert!(state.player.crouching);
        }
    }

    #[test]
    fn test_milestone_fires_once_per_crossing() {
        let mut state = playing(Difficulty::Normal);
        state.score_acc = 99.95;
        step(&mut state, &mut never());
        assert_eq!(state.score, 100);
        assert_eq!(state.drain_events(), vec![GameEvent::Milestone(100)]);
        for _ in 0..20 {
            step(&mut state, &mut never());
        }
        assert!(state.drain_events().is_empty());
        assert_eq!(state.last_milestone, 100);
    }

    #[test]
    fn test_speed_curve() {
        let tuning = Tuning::default();
        assert_eq!(target_speed(&tuning, 4.0, 0), 4.0);
        assert!((target_speed(&tuning, 4.0, 99) - 4.495).abs() < 1e-4);
        assert!((target_speed(&tuning, 4.0, 100) - 5.5).abs() < 1e-4);
        assert_eq!(target_speed(&tuning, 4.0, 5000), 12.0);
    }

    #[test]
    fn test_simulation_with_seed_is_deterministic() {
        let state = GameState::new(Tuning::default(), Difficulty::Normal, 0);
        let mut a = Simulation::new(state.clone(), 1);
        let mut b = Simulation::new(state, 1);
        a.start_seeded(777);
        b.start_seeded(777);
        for _ in 0..600 {
            a.step();
            b.step();
        }
        assert_eq!(a.state.score_acc, b.state.score_acc);
        assert_eq!(a.state.obstacles.len(), b.state.obstacles.len());
        assert_eq!(a.phase(), b.phase());
    }

    #[test]
    fn test_simulation_with_injected_rng() {
        let state = GameState::new(Tuning::default(), Difficulty::Easy, 0);
        let mut sim = Simulation::with_rng(state, never());
        assert!(sim.apply(Command::Start));
        for _ in 0..1010 {
            sim.step();
        }
        assert_eq!(sim.phase(), GamePhase::Playing);
        assert!(sim.state.obstacles.is_empty());
        assert_eq!(sim.state.score, 100);
        assert_eq!(sim.drain_events(), vec![GameEvent::Milestone(100)]);
    }

    proptest! {
        #[test]
        fn prop_player_never_below_ground(
            seed in any::<u64>(),
            jumps in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let mut state = playing(Difficulty::Normal);
            let mut rng = Pcg32::seed_from_u64(seed);
            for jump in jumps {
                if jump {
                    state.jump();
                }
                step(&mut state, &mut rng);
                prop_assert!(state.player.pos.y <= state.tuning.ground_y);
            }
        }

        #[test]
        fn prop_score_and_speed_monotonic(seed in any::<u64>(), steps in 1usize..3000) {
            let mut state = playing(Difficulty::Hard);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut last_score = state.score_acc;
            let mut last_speed = state.speed;
            for _ in 0..steps {
                let was_playing = state.phase == GamePhase::Playing;
                step(&mut state, &mut rng);
                prop_assert!(state.score_acc >= last_score);
                prop_assert!(state.speed >= last_speed);
                prop_assert!(state.speed <= state.tuning.max_speed);
                if was_playing && state.phase == GamePhase::GameOver {
                    // Frozen at the collision step
                    prop_assert_eq!(state.score_acc, last_score);
                }
                last_score = state.score_acc;
                last_speed = state.speed;
            }
        }

        #[test]
        fn prop_no_offscreen_obstacles(seed in any::<u64>(), steps in 1usize..2000) {
            let mut state = playing(Difficulty::Normal);
            state.player.pos.x = -1000.0;
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..steps {
                step(&mut state, &mut rng);
                prop_assert!(state.obstacles.iter().all(|o| o.right_edge() > 0.0));
            }
        }
    }
}
