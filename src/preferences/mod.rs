//! Local preference stores
//!
//! Watch history, watchlist and last-watched episode are each kept as one
//! JSON blob in a [`KeyValueStore`]. Every mutation re-reads the whole blob,
//! modifies it and writes it back. Two processes sharing a store race with
//! last-write-wins semantics; nothing coordinates them.

mod file_store;
mod history;
mod last_watched;
mod memory_store;
mod watchlist;

pub use file_store::FileStore;
pub use history::{HISTORY_CAPACITY, HISTORY_KEY, History, HistoryEntry};
pub use last_watched::{EpisodePosition, LAST_WATCHED_KEY, LastWatched};
pub use memory_store::MemoryStore;
pub use watchlist::{WATCHLIST_KEY, Watchlist, WatchlistEntry};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a preference blob
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create or access the store directory
    #[error("Failed to create store directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a stored blob
    #[error("Failed to read store file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a blob
    #[error("Failed to write store file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to delete a blob
    #[error("Failed to remove store file {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored blob is not valid JSON for its store
    #[error("Failed to deserialize stored value {key}: {source}")]
    DeserializationFailed {
        key: String,
        source: serde_json::Error,
    },

    /// Failed to serialize a value for storing
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Repository abstraction over string-keyed persistent blobs
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the blob stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes the blob stored under `key`; absent keys are not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reads and decodes a blob, yielding `T::default()` when absent
pub(crate) fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match store.read(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::DeserializationFailed {
            key: key.to_string(),
            source: e,
        }),
        None => Ok(T::default()),
    }
}

/// Encodes and writes a whole blob
pub(crate) fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.write(key, &raw)
}
