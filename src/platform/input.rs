//! Input mapping
//!
//! Raw keyboard/pointer/touch inputs become simulation [`Command`]s based on
//! the current phase. Nothing is buffered: a command that makes no sense right
//! now is still forwarded and the simulation drops it.

use crate::sim::{Command, GamePhase};

/// Device-independent raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Space, click or tap on the canvas
    Primary,
    /// Crouch key or button pressed
    CrouchDown,
    /// Crouch key or button released
    CrouchUp,
    /// Escape / P
    PauseToggle,
    /// Reset button
    Reset,
}

/// Translate a raw input into a command for the given phase
pub fn map_input(phase: GamePhase, event: InputEvent) -> Option<Command> {
    match event {
        InputEvent::Primary => match phase {
            GamePhase::Waiting | GamePhase::GameOver => Some(Command::Start),
            GamePhase::Playing => Some(Command::Jump),
            GamePhase::Paused => None,
        },
        InputEvent::CrouchDown => Some(Command::Crouch(true)),
        InputEvent::CrouchUp => Some(Command::Crouch(false)),
        InputEvent::PauseToggle => match phase {
            GamePhase::Playing => Some(Command::Pause),
            GamePhase::Paused => Some(Command::Resume),
            _ => None,
        },
        InputEvent::Reset => Some(Command::Reset),
    }
}

/// Map a `KeyboardEvent.key` value; `pressed` is false on keyup
pub fn key_to_input(key: &str, pressed: bool) -> Option<InputEvent> {
    match (key, pressed) {
        (" " | "Spacebar", true) => Some(InputEvent::Primary),
        ("ArrowDown" | "s" | "S", true) => Some(InputEvent::CrouchDown),
        ("ArrowDown" | "s" | "S", false) => Some(InputEvent::CrouchUp),
        ("Escape" | "p" | "P", true) => Some(InputEvent::PauseToggle),
        _ => None,
    }
}
