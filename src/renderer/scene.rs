//! Frame assembly: game state in, triangle list out
//!
//! Geometry is laid out in canvas pixels (origin top-left, y down) and mapped
//! to clip space at the end, so nothing here touches the GPU.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{GamePhase, GameState, Obstacle, Player};

/// Spacing of the ground speckle pattern
const DOT_SPACING: f32 = 20.0;
const DOT_SIZE: f32 = 2.0;
/// Distance of the speckle row below the ground line
const DOT_DROP: f32 = 10.0;
const GROUND_STROKE: f32 = 2.0;

/// Canvas pixel to normalized device coordinates
pub fn canvas_to_ndc(p: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(p.x / canvas.x * 2.0 - 1.0, 1.0 - p.y / canvas.y * 2.0)
}

/// Build every triangle for one frame, already in clip space
pub fn build_frame(state: &GameState, reduced_motion: bool) -> Vec<Vertex> {
    let canvas = Vec2::new(state.tuning.canvas_width, state.tuning.canvas_height);
    let mut out = Vec::with_capacity(512);

    draw_background(&mut out, state, reduced_motion);
    draw_player(&mut out, &state.player);
    for obstacle in &state.obstacles {
        draw_obstacle(&mut out, obstacle);
    }
    draw_overlay(&mut out, state.phase, canvas);

    for v in &mut out {
        let ndc = canvas_to_ndc(Vec2::from(v.position), canvas);
        v.position = ndc.into();
    }
    out
}

fn draw_background(out: &mut Vec<Vertex>, state: &GameState, reduced_motion: bool) {
    let t = &state.tuning;
    let floor = t.floor_y();

    out.extend(shapes::gradient_rect(
        Vec2::ZERO,
        Vec2::new(t.canvas_width, t.canvas_height),
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));
    out.extend(shapes::hline(
        0.0,
        t.canvas_width,
        floor,
        GROUND_STROKE,
        colors::GROUND_LINE,
    ));

    let scroll = if reduced_motion { 0.0 } else { state.distance };
    let first = (scroll / DOT_SPACING).floor() as i64;
    let offset = scroll.rem_euclid(DOT_SPACING);
    let slots = (t.canvas_width / DOT_SPACING).ceil() as i64 + 1;
    for slot in 0..slots {
        if !speckle_at(first + slot) {
            continue;
        }
        let x = slot as f32 * DOT_SPACING - offset;
        out.extend(shapes::rect(
            Vec2::new(x, floor + DOT_DROP),
            Vec2::splat(DOT_SIZE),
            colors::GROUND_DOT,
        ));
    }
}

/// Whether a ground slot carries a speckle; stable per world position
fn speckle_at(index: i64) -> bool {
    let hash = (index as u64).wrapping_mul(2_654_435_761) >> 7;
    hash % 10 < 3
}

fn draw_player(out: &mut Vec<Vertex>, player: &Player) {
    let body = player.hitbox();
    out.extend(shapes::aabb(&body, colors::PLAYER));

    if !player.jumping {
        let stride = if player.leg_frame() == 0 { 0.0 } else { 5.0 };
        let leg_y = body.bottom() - 10.0;
        for leg_x in [5.0 + stride, 25.0 - stride] {
            out.extend(shapes::rect(
                Vec2::new(body.left() + leg_x, leg_y),
                Vec2::new(8.0, 10.0),
                colors::PLAYER_DETAIL,
            ));
        }
    }

    let eye = Vec2::new(body.left() + 28.0, body.top() + 6.0);
    out.extend(shapes::rect(eye, Vec2::splat(8.0), colors::EYE_WHITE));
    out.extend(shapes::rect(
        eye + Vec2::new(4.0, 2.0),
        Vec2::splat(3.0),
        colors::EYE_PUPIL,
    ));
}

fn draw_obstacle(out: &mut Vec<Vertex>, obstacle: &Obstacle) {
    let body = obstacle.hitbox();
    out.extend(shapes::aabb(&body, colors::OBSTACLE));
    let ridge = Vec2::new(2.0, (body.size.y - 10.0).max(0.0));
    for x in [body.left() + 3.0, body.right() - 5.0] {
        out.extend(shapes::rect(
            Vec2::new(x, body.top() + 5.0),
            ridge,
            colors::OBSTACLE_DETAIL,
        ));
    }
}

fn draw_overlay(out: &mut Vec<Vertex>, phase: GamePhase, canvas: Vec2) {
    let color = match phase {
        GamePhase::Waiting => colors::OVERLAY_WAITING,
        GamePhase::Paused => colors::OVERLAY_PAUSED,
        GamePhase::GameOver => colors::OVERLAY_GAME_OVER,
        GamePhase::Playing => return,
    };
    out.extend(shapes::rect(Vec2::ZERO, canvas, color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(Tuning::default(), Difficulty::Normal, 0);
        state.start();
        state
    }

    fn count_color(verts: &[Vertex], color: [f32; 4]) -> usize {
        verts.iter().filter(|v| v.color == color).count()
    }

    #[test]
    fn test_canvas_to_ndc_corners() {
        let canvas = Vec2::new(800.0, 300.0);
        assert_eq!(canvas_to_ndc(Vec2::ZERO, canvas), Vec2::new(-1.0, 1.0));
        assert_eq!(canvas_to_ndc(canvas, canvas), Vec2::new(1.0, -1.0));
        assert_eq!(
            canvas_to_ndc(Vec2::new(400.0, 150.0), canvas),
            Vec2::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_frame_is_triangle_list_in_clip_space() {
        let mut state = playing();
        state.obstacles.push(Obstacle {
            id: 1,
            pos: Vec2::new(-5.0, 210.0),
            width: 17.0,
            height: 35.0,
            speed: 4.0,
        });
        let verts = build_frame(&state, false);
        assert_eq!(verts.len() % 3, 0);
        // Sky covers exactly the canvas
        let sky: Vec<_> = verts.iter().filter(|v| v.color == colors::SKY_TOP).collect();
        assert!(sky.iter().all(|v| v.position[1] == 1.0));
    }

    #[test]
    fn test_overlay_only_when_not_playing() {
        let mut state = playing();
        let overlays = [
            colors::OVERLAY_WAITING,
            colors::OVERLAY_PAUSED,
            colors::OVERLAY_GAME_OVER,
        ];
        let frame = build_frame(&state, false);
        assert!(overlays.iter().all(|c| count_color(&frame, *c) == 0));

        state.pause();
        assert_eq!(count_color(&build_frame(&state, false), colors::OVERLAY_PAUSED), 6);
        state.phase = GamePhase::GameOver;
        assert_eq!(count_color(&build_frame(&state, false), colors::OVERLAY_GAME_OVER), 6);
        state.reset();
        assert_eq!(count_color(&build_frame(&state, false), colors::OVERLAY_WAITING), 6);
    }

    #[test]
    fn test_legs_hidden_mid_jump() {
        let mut state = playing();
        let grounded = count_color(&build_frame(&state, false), colors::PLAYER_DETAIL);
        assert_eq!(grounded, 12);
        state.jump();
        assert_eq!(count_color(&build_frame(&state, false), colors::PLAYER_DETAIL), 0);
    }

    #[test]
    fn test_obstacle_drawn_per_entity() {
        let mut state = playing();
        for (i, x) in [300.0, 500.0].into_iter().enumerate() {
            state.obstacles.push(Obstacle {
                id: i as u32,
                pos: Vec2::new(x, 210.0),
                width: 17.0,
                height: 35.0,
                speed: 4.0,
            });
        }
        let frame = build_frame(&state, false);
        assert_eq!(count_color(&frame, colors::OBSTACLE), 12);
        assert_eq!(count_color(&frame, colors::OBSTACLE_DETAIL), 24);
    }

    #[test]
    fn test_reduced_motion_freezes_ground() {
        let mut state = playing();
        let still = build_frame(&state, true);
        state.distance = 137.0;
        assert_eq!(build_frame(&state, true), still);
        assert_ne!(build_frame(&state, false), still);
    }
}
