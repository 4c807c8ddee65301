//! Last watched episode per series

use super::{KeyValueStore, StoreError, load_json, save_json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Store key of the last-watched blob
pub const LAST_WATCHED_KEY: &str = "last-watched";

/// A season/episode pair, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePosition {
    pub season: u32,
    pub episode: u32,
}

impl Default for EpisodePosition {
    fn default() -> Self {
        Self {
            season: 1,
            episode: 1,
        }
    }
}

impl EpisodePosition {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }

    /// Switching season starts at its first episode
    pub fn with_season(self, season: u32) -> Self {
        Self { season, episode: 1 }
    }

    pub fn with_episode(self, episode: u32) -> Self {
        Self { episode, ..self }
    }
}

/// One overwritten position per series id
#[derive(Clone)]
pub struct LastWatched {
    store: Arc<dyn KeyValueStore>,
}

impl LastWatched {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn positions(&self) -> Result<BTreeMap<u64, EpisodePosition>, StoreError> {
        load_json(self.store.as_ref(), LAST_WATCHED_KEY)
    }

    /// The remembered position, if the series was watched before
    pub fn get(&self, series_id: u64) -> Result<Option<EpisodePosition>, StoreError> {
        Ok(self.positions()?.get(&series_id).copied())
    }

    /// The remembered position, or season 1 episode 1
    pub fn get_or_default(&self, series_id: u64) -> Result<EpisodePosition, StoreError> {
        Ok(self.get(series_id)?.unwrap_or_default())
    }

    pub fn set(&self, series_id: u64, position: EpisodePosition) -> Result<(), StoreError> {
        let mut positions = self.positions()?;
        positions.insert(series_id, position);
        save_json(self.store.as_ref(), LAST_WATCHED_KEY, &positions)
    }
}
