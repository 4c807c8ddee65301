//! File-backed key-value store
//!
//! Each key is stored as `<sanitized key>.json` inside one directory.

use super::{KeyValueStore, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A key-value store keeping one file per key
///
/// Writes replace the whole file. Concurrent writers from different
/// processes are not coordinated; the last write wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// The directory where blobs are stored
    dir: PathBuf,
}

impl FileStore {
    /// Opens or creates a store rooted at `dir`
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let store = FileStore::open(config.resolve_data_dir()?)?;
    /// ```
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|e| StoreError::DirectoryCreationFailed {
            path: dir.clone(),
            source: e,
        })?;

        Ok(Self { dir })
    }

    /// Returns the directory the blobs live in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_name(key)))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let file_path = self.path_for(key);

        match fs::read_to_string(&file_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadFailed {
                path: file_path,
                source: e,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let file_path = self.path_for(key);

        fs::write(&file_path, value).map_err(|e| StoreError::WriteFailed {
            path: file_path,
            source: e,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let file_path = self.path_for(key);

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::RemoveFailed {
                path: file_path,
                source: e,
            }),
        }
    }
}

/// Sanitizes a key for use in file paths
///
/// Converts to lowercase and replaces all characters that are not
/// a-z, 0-9, or hyphen with underscores.
fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
