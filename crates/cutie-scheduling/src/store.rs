//! JSON-file backed record stores.
//!
//! A store keeps every record in memory and rewrites its whole file after
//! each mutation. Loading never fails: a missing or damaged file gives an
//! empty store and a record that does not validate is skipped.

use crate::error::StoreError;
use crate::item::ScheduledItem;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A store shared between the dispatcher and the interaction handlers.
pub type SharedStore<T> = Arc<Mutex<RecordStore<T>>>;

/// Records keyed by id, persisted to one JSON file.
#[derive(Debug)]
pub struct RecordStore<T> {
    path: PathBuf,
    records: BTreeMap<String, T>,
}

impl<T> RecordStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates an empty store that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    /// Loads the records stored at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::empty(path);

        let raw = match std::fs::read_to_string(&store.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No records at {}, starting empty", store.path.display());
                return store;
            }
            Err(e) => {
                warn!("Failed to read {}: {}, starting empty", store.path.display(), e);
                return store;
            }
        };

        let entries = match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&raw)
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Malformed records in {}: {}, starting empty", store.path.display(), e);
                return store;
            }
        };

        for (id, value) in entries {
            match serde_json::from_value::<T>(value) {
                Ok(record) => {
                    store.records.insert(id, record);
                }
                Err(e) => warn!("Skipping record {} in {}: {}", id, store.path.display(), e),
            }
        }

        info!("Loaded {} records from {}", store.records.len(), store.path.display());
        store
    }

    /// Wraps the store for sharing between tasks.
    pub fn shared(self) -> SharedStore<T> {
        Arc::new(Mutex::new(self))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the backing file with every record.
    ///
    /// The file is replaced atomically so a crash never leaves it half
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be encoded or written.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.records)?;

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory).map_err(|source| StoreError::Io {
            path: directory.clone(),
            source,
        })?;

        let mut file =
            tempfile::NamedTempFile::new_in(&directory).map_err(|source| StoreError::Io {
                path: directory.clone(),
                source,
            })?;
        file.write_all(&json)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|source| StoreError::Io {
                path: file.path().to_path_buf(),
                source,
            })?;
        file.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!("Saved {} records to {}", self.records.len(), self.path.display());
        Ok(())
    }

    /// Inserts or replaces the record under `id`, then saves.
    ///
    /// # Errors
    ///
    /// Returns the save error. The record stays in memory.
    pub fn add(&mut self, id: impl Into<String>, record: T) -> Result<(), StoreError> {
        self.records.insert(id.into(), record);
        self.save()
    }

    /// Removes the record under `id`, saving if one was removed.
    ///
    /// # Errors
    ///
    /// Returns the save error. The record stays removed from memory.
    pub fn remove(&mut self, id: &str) -> Result<Option<T>, StoreError> {
        let removed = self.records.remove(id);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }
}

impl<T> RecordStore<T> {
    /// Gets a record.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    /// Gets a record for mutation. Call [`RecordStore::save`] afterwards.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.records.get_mut(id)
    }

    /// Whether a record exists under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.records.iter()
    }
}

impl<T> RecordStore<T>
where
    T: ScheduledItem + Clone,
{
    /// Copies the records due at `now`.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<(String, T)> {
        self.records
            .iter()
            .filter(|(_, record)| record.is_due(now))
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }
}
