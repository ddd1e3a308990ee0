//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (fixed-step scheduling off the display refresh)
//! - Input events
//! - Storage (LocalStorage on web, memory elsewhere)

pub mod clock;
pub mod input;
pub mod storage;

pub use clock::StepClock;
pub use input::{InputEvent, key_to_input, map_input};
pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
