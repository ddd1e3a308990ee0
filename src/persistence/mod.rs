//! Best score and settings persistence
//!
//! Features:
//! - Single integer best score under a fixed key
//! - Settings as a JSON blob
//! - Falls back to session-only memory when storage misbehaves; callers never
//!   see an error

use crate::platform::{KeyValueStore, MemoryStore, StorageError};
use crate::settings::Settings;

/// Key holding the best score as a decimal string
pub const BEST_SCORE_KEY: &str = "dinoJumpHighScore";

/// Parse a stored best score the lenient way: leading digits win, junk is 0
pub fn parse_best(raw: &str) -> u32 {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Persistence adapter over any key-value store
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    session_only: bool,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            session_only: false,
        }
    }

    /// Memory-only persistence for this session
    pub fn session_only() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            session_only: true,
        }
    }

    /// Browser LocalStorage, or memory if it is unavailable
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        match crate::platform::LocalStore::open() {
            Ok(store) => Self::new(Box::new(store)),
            Err(e) => {
                log::warn!("{}; best score will last this session only", e);
                Self::session_only()
            }
        }
    }

    pub fn is_session_only(&self) -> bool {
        self.session_only
    }

    /// Stored best score, 0 when missing or unreadable
    pub fn load_best(&mut self) -> u32 {
        match self.store.get(BEST_SCORE_KEY) {
            Ok(Some(raw)) => {
                let best = parse_best(&raw);
                log::info!("Loaded best score {}", best);
                best
            }
            Ok(None) => 0,
            Err(e) => {
                self.degrade(e);
                0
            }
        }
    }

    pub fn save_best(&mut self, score: u32) {
        if let Err(e) = self.store.set(BEST_SCORE_KEY, &score.to_string()) {
            self.degrade(e);
            // Memory store cannot fail
            let _ = self.store.set(BEST_SCORE_KEY, &score.to_string());
            return;
        }
        log::info!("Best score saved ({})", score);
    }

    /// Stored settings, defaults when missing or malformed
    pub fn load_settings(&mut self) -> Settings {
        match self.store.get(Settings::STORAGE_KEY) {
            Ok(Some(json)) => Settings::from_json(&json).unwrap_or_default(),
            Ok(None) => Settings::default(),
            Err(e) => {
                self.degrade(e);
                Settings::default()
            }
        }
    }

    pub fn save_settings(&mut self, settings: &Settings) {
        let Some(json) = settings.to_json() else {
            return;
        };
        if let Err(e) = self.store.set(Settings::STORAGE_KEY, &json) {
            self.degrade(e);
            let _ = self.store.set(Settings::STORAGE_KEY, &json);
        }
    }

    /// Swap to an in-memory store after the first failure
    fn degrade(&mut self, error: StorageError) {
        if self.session_only {
            return;
        }
        log::warn!("Storage failed ({}); continuing with session-only storage", error);
        self.store = Box::new(MemoryStore::new());
        self.session_only = true;
    }
}
