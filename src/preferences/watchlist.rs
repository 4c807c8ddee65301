//! Titles saved for later

use super::{KeyValueStore, StoreError, load_json, save_json};
use crate::media::{MediaItem, MediaKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Store key of the watchlist blob
pub const WATCHLIST_KEY: &str = "watchlist";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
}

impl From<&MediaItem> for WatchlistEntry {
    fn from(item: &MediaItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            rating: item.rating,
            release_date: item.release_date.clone(),
        }
    }
}

/// Uncapped list of saved titles, unique by id alone
///
/// Uniqueness ignores the kind, so callers must hand in items whose kind
/// is already settled.
#[derive(Clone)]
pub struct Watchlist {
    store: Arc<dyn KeyValueStore>,
}

impl Watchlist {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All entries, most recently added first
    pub fn entries(&self) -> Result<Vec<WatchlistEntry>, StoreError> {
        load_json(self.store.as_ref(), WATCHLIST_KEY)
    }

    pub fn contains(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.entries()?.iter().any(|e| e.id == id))
    }

    /// Adds `item` unless its id is already saved; returns whether it was added
    pub fn add(&self, item: &MediaItem) -> Result<bool, StoreError> {
        let mut entries = self.entries()?;
        if entries.iter().any(|e| e.id == item.id) {
            return Ok(false);
        }

        info!(id = item.id, kind = %item.kind, "Adding to watchlist");
        entries.insert(0, WatchlistEntry::from(item));
        save_json(self.store.as_ref(), WATCHLIST_KEY, &entries)?;
        Ok(true)
    }

    /// Removes the entry with `id`; returns whether one was removed
    pub fn remove(&self, id: u64) -> Result<bool, StoreError> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }

        info!(id, "Removing from watchlist");
        save_json(self.store.as_ref(), WATCHLIST_KEY, &entries)?;
        Ok(true)
    }

    /// Adds or removes `item`; returns whether it is saved afterwards
    pub fn toggle(&self, item: &MediaItem) -> Result<bool, StoreError> {
        if self.remove(item.id)? {
            Ok(false)
        } else {
            self.add(item)
        }
    }
}
