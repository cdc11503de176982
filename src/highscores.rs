//! Best score persistence
//!
//! A single record (score and the wave it was reached on), loaded once at
//! startup and written back whenever it improves.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};

/// The best run so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u64,
    /// Wave reached on the record run
    #[serde(default)]
    pub wave: u32,
}

impl HighScore {
    /// Storage key
    const STORAGE_KEY: &'static str = "high_score";

    /// Would `score` beat the current record?
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a finished (or in-progress) run; returns true if it is a new best
    pub fn record(&mut self, score: u64, wave: u32) -> bool {
        if !self.beaten_by(score) {
            return false;
        }
        self.score = score;
        self.wave = wave;
        true
    }

    /// Load the stored record, starting fresh when none exists
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<HighScore>(storage, Self::STORAGE_KEY) {
            Some(best) => {
                log::info!("Loaded high score {} (wave {})", best.score, best.wave);
                best
            }
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &dyn Storage) {
        if save_json(storage, Self::STORAGE_KEY, self) {
            log::debug!("High score saved ({})", self.score);
        }
    }
}
