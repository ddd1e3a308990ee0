//! HUD text and toast notifications
//!
//! Pure presentation helpers; the wasm shell writes their output into the DOM.

use std::collections::VecDeque;

use crate::sim::{GameEvent, GamePhase};

/// Viewport width below which the touch controls are shown
pub const MOBILE_BREAKPOINT: u32 = 768;

/// How long a toast stays up, in seconds
pub const TOAST_SECONDS: f32 = 2.5;

/// Most toasts kept in the queue
const MAX_TOASTS: usize = 3;

/// Score as shown in the HUD: zero padded to five digits
pub fn format_score(score: u32) -> String {
    format!("{:05}", score)
}

/// Status readout for the HUD
pub fn status_label(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Waiting => "READY",
        GamePhase::Playing => "RUNNING",
        GamePhase::Paused => "PAUSED",
        GamePhase::GameOver => "CRASHED",
    }
}

/// CSS class for the status readout
pub fn status_class(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Waiting => "status ready",
        GamePhase::Playing => "status running",
        GamePhase::Paused => "status paused",
        GamePhase::GameOver => "status crashed",
    }
}

/// Headline and hint drawn over the canvas, if any
pub fn overlay_text(phase: GamePhase) -> Option<(&'static str, &'static str)> {
    match phase {
        GamePhase::Waiting => Some((
            "PRESS SPACE TO START",
            "Jump over obstacles and beat your high score!",
        )),
        GamePhase::Paused => Some(("PAUSED", "Press ESC to resume")),
        GamePhase::GameOver => Some(("GAME OVER", "Press SPACE to restart")),
        GamePhase::Playing => None,
    }
}

pub fn is_mobile(viewport_width: u32) -> bool {
    viewport_width < MOBILE_BREAKPOINT
}

/// A short-lived message
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    /// Seconds left on screen
    pub ttl: f32,
}

/// Toast queue; only the front toast is visible
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, title: impl Into<String>, body: impl Into<String>) {
        if self.queue.len() == MAX_TOASTS {
            self.queue.pop_back();
        }
        self.queue.push_back(Toast {
            title: title.into(),
            body: body.into(),
            ttl: TOAST_SECONDS,
        });
    }

    /// Turn a simulation event into a toast where one is warranted
    pub fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Milestone(score) => {
                self.push("Milestone!", format!("{} points and counting", score));
            }
            GameEvent::NewBest { score } => {
                self.push("New high score!", format!("You set a new record: {}", score));
            }
            GameEvent::Jumped | GameEvent::GameOver { .. } => {}
        }
    }

    /// Age the visible toast
    pub fn tick(&mut self, dt: f32) {
        if let Some(front) = self.queue.front_mut() {
            front.ttl -= dt;
            if front.ttl <= 0.0 {
                self.queue.pop_front();
            }
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.queue.front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
