//! Recently viewed titles

use super::{KeyValueStore, StoreError, load_json, save_json};
use crate::media::{MediaItem, MediaKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Store key of the history blob
pub const HISTORY_KEY: &str = "history";

/// Maximum number of remembered titles
pub const HISTORY_CAPACITY: usize = 20;

/// A snapshot of a title taken when its detail page was viewed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub rating: Option<f64>,
    pub viewed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_item(item: &MediaItem, viewed_at: DateTime<Utc>) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            rating: item.rating,
            viewed_at,
        }
    }

    fn same_title(&self, other: &HistoryEntry) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

/// Newest-first list of viewed titles, unique by `(id, kind)`
#[derive(Clone)]
pub struct History {
    store: Arc<dyn KeyValueStore>,
}

impl History {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All entries, most recently viewed first
    pub fn entries(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        load_json(self.store.as_ref(), HISTORY_KEY)
    }

    /// Records a view of `item` now
    pub fn record(&self, item: &MediaItem) -> Result<(), StoreError> {
        self.record_entry(HistoryEntry::from_item(item, Utc::now()))
    }

    /// Moves the entry to the front, replacing an older view of the same
    /// title, and evicts the oldest entries beyond [`HISTORY_CAPACITY`]
    pub fn record_entry(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        let mut entries = self.entries()?;
        entries.retain(|existing| !existing.same_title(&entry));
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAPACITY);
        save_json(self.store.as_ref(), HISTORY_KEY, &entries)
    }

    /// Forgets every entry
    pub fn clear(&self) -> Result<(), StoreError> {
        info!("Clearing watch history");
        self.store.remove(HISTORY_KEY)
    }
}
