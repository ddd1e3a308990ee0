//! Dino Jump - a side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (clock, input, storage)
//! - `persistence`: Best score and settings storage
//! - `tuning`: Data-driven game balance
//! - `ui`: HUD text and toasts

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep; balance values are per step at 60 Hz
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}
