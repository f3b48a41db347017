use alloc::string::{String, ToString};
use hashbrown::HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::*;

pub const GAME_KEY: &str = "game_state";
pub const BEST_SCORE_KEY: &str = "best_score";
pub const STATISTICS_KEY: &str = "statistics";

/// String key-value storage provided by the host platform.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("Stored {key} is corrupted: {source}")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Saves and loads engine data as JSON values in a [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct GameRepository<S> {
    store: S,
}

impl<S: KeyValueStore> GameRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn save_game(&mut self, state: &GameState) -> core::result::Result<(), StoreError> {
        self.save(GAME_KEY, state)
    }

    /// `None` when no game was saved.
    pub fn load_game(&self) -> core::result::Result<Option<GameState>, StoreError> {
        self.load(GAME_KEY)
    }

    pub fn clear_game(&mut self) {
        self.store.remove(GAME_KEY);
    }

    pub fn save_best_score(&mut self, best_score: Score) -> core::result::Result<(), StoreError> {
        self.save(BEST_SCORE_KEY, &best_score)
    }

    pub fn load_best_score(&self) -> core::result::Result<Score, StoreError> {
        Ok(self.load(BEST_SCORE_KEY)?.unwrap_or(0))
    }

    pub fn save_statistics(
        &mut self,
        stats: &GameStatistics,
    ) -> core::result::Result<(), StoreError> {
        self.save(STATISTICS_KEY, stats)
    }

    pub fn load_statistics(&self) -> core::result::Result<GameStatistics, StoreError> {
        Ok(self.load(STATISTICS_KEY)?.unwrap_or_default())
    }

    fn save<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> core::result::Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
        self.store.set(key, json);
        Ok(())
    }

    fn load<T: DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> core::result::Result<Option<T>, StoreError> {
        let Some(json) = self.store.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(&json).map(Some).map_err(|source| {
            log::warn!("Discarding stored {}: {}", key, source);
            StoreError::Decode { key, source }
        })
    }
}
