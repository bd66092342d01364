//! Score display and the persisted high score
//!
//! The score itself is derived from game state (elapsed seconds plus hits);
//! only the best score ever seen survives a restart.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub value: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "hiscore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load from storage; missing or garbled values count as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(raw) = store.get_item(Self::STORAGE_KEY) else {
            log::info!("No high score found, starting fresh");
            return Self::new();
        };

        match raw.trim().parse::<u64>() {
            Ok(value) => {
                log::info!("Loaded high score {}", value);
                Self { value }
            }
            Err(_) => {
                log::warn!("Ignoring unreadable high score {:?}", raw);
                Self::new()
            }
        }
    }

    /// Persist the current value
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set_item(Self::STORAGE_KEY, &self.value.to_string())
    }

    /// Record a score. Returns true if it beat the high score, in which case
    /// the new value has already been written back.
    pub fn observe(
        &mut self,
        score: u64,
        store: &mut impl KeyValueStore,
    ) -> Result<bool, StorageError> {
        if score <= self.value {
            return Ok(false);
        }
        self.value = score;
        self.save(store)?;
        Ok(true)
    }
}

/// HUD text
pub fn score_line(high: &HighScore, score: u64) -> String {
    format!("HISCORE: {} SCORE: {}", high.value, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_load_missing_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).value, 0);
    }

    #[test]
    fn test_load_garbage_is_zero() {
        let mut store = MemoryStore::new();
        store.set_item(HighScore::STORAGE_KEY, "lots").unwrap();
        assert_eq!(HighScore::load(&store).value, 0);
    }

    #[test]
    fn test_observe_only_raises() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::new();
        assert!(high.observe(5, &mut store).unwrap());
        assert!(!high.observe(5, &mut store).unwrap());
        assert!(!high.observe(3, &mut store).unwrap());
        assert!(high.observe(9, &mut store).unwrap());
        assert_eq!(high.value, 9);
        assert_eq!(store.get_item(HighScore::STORAGE_KEY).as_deref(), Some("9"));
    }

    #[test]
    fn test_high_score_survives_sessions() {
        let mut store = MemoryStore::new();

        let mut first = HighScore::load(&store);
        for score in [1, 4, 12, 7] {
            first.observe(score, &mut store).unwrap();
        }

        let mut second = HighScore::load(&store);
        assert_eq!(second.value, 12);
        for score in [2, 10] {
            second.observe(score, &mut store).unwrap();
        }
        assert_eq!(HighScore::load(&store).value, 12);
    }

    #[test]
    fn test_score_line() {
        let high = HighScore { value: 120 };
        assert_eq!(score_line(&high, 37), "HISCORE: 120 SCORE: 37");
    }
}
