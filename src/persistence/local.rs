//! Local cache implementations
//!
//! - `FileCache` keeps one JSON document per key in a directory and survives
//!   restarts
//! - `MemoryCache` keeps values in a concurrent map for the lifetime of the
//!   process; used by `--ephemeral` runs and tests

use crate::persistence::traits::LocalCache;
use crate::types::StoreError;
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::error;

/// Directory-backed cache storing each key as `<dir>/<key>.json`
///
/// Writes go to a sibling `.tmp` file that is renamed over the target, so a
/// reader never observes a half-written document. Multi-key writes also keep
/// a `.bak` copy of each target until every key is published, and put those
/// copies back if any key fails.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (creating if needed) a cache directory
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::IoError {
            message: format!("Failed to create cache directory '{}': {}", dir.display(), e),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn staging_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.tmp"))
    }

    fn stage(&self, key: &str, value: &str) -> Result<PathBuf, StoreError> {
        let staging = self.staging_path_for(key);
        fs::write(&staging, value)
            .map_err(|e| StoreError::local_persistence(key, e.to_string()))?;
        Ok(staging)
    }

    fn backup_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.bak"))
    }

    fn publish(&self, key: &str, staging: &Path) -> Result<(), StoreError> {
        fs::rename(staging, self.path_for(key))
            .map_err(|e| StoreError::local_persistence(key, e.to_string()))
    }

    /// Copy the current value of `key` aside; `None` if it was never written
    fn back_up(&self, key: &str) -> Result<Option<PathBuf>, StoreError> {
        let backup = self.backup_path_for(key);
        match fs::copy(self.path_for(key), &backup) {
            Ok(_) => Ok(Some(backup)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::local_persistence(key, e.to_string())),
        }
    }

    /// Put a published key back to its value before the write
    fn restore(&self, key: &str, backup: Option<&Path>) {
        let target = self.path_for(key);
        let result = match backup {
            Some(backup) => fs::rename(backup, &target),
            None => fs::remove_file(&target),
        };
        if let Err(e) = result {
            error!(key, error = %e, "Failed to roll back cache key");
        }
    }

    fn discard(paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            let _ = fs::remove_file(path);
        }
    }
}

impl LocalCache for FileCache {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::local_persistence(key, e.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let staging = self.stage(key, value)?;
        self.publish(key, &staging)
    }

    /// Stage every entry, then publish them all or none
    fn write_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match self.stage(key, value) {
                Ok(path) => staged.push((*key, path)),
                Err(e) => {
                    Self::discard(staged.into_iter().map(|(_, path)| path));
                    return Err(e);
                }
            }
        }

        let mut published: Vec<(&str, Option<PathBuf>)> = Vec::with_capacity(staged.len());
        for (index, (key, staging)) in staged.iter().enumerate() {
            let outcome = self.back_up(key).and_then(|backup| match self.publish(key, staging) {
                Ok(()) => Ok(backup),
                Err(e) => {
                    Self::discard(backup);
                    Err(e)
                }
            });

            match outcome {
                Ok(backup) => published.push((*key, backup)),
                Err(e) => {
                    for (key, backup) in published.iter().rev() {
                        self.restore(key, backup.as_deref());
                    }
                    Self::discard(staged[index..].iter().map(|(_, path)| path.clone()));
                    return Err(e);
                }
            }
        }

        Self::discard(published.into_iter().filter_map(|(_, backup)| backup));
        Ok(())
    }
}

/// Process-lifetime cache backed by a `DashMap`
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
}

impl MemoryCache {
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

impl LocalCache for MemoryCache {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
