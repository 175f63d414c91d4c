//! Persistent key/value storage
//!
//! Two scopes are available: a durable scope that survives restarts and a
//! session scope that lives as long as the process. Values are stored as JSON.
//! Reads and writes through [`PersistentStore`] never fail: problems are logged
//! and the caller gets the default (for reads) or nothing (for writes).

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Survives restarts
    Durable,

    /// Cleared when the session ends
    Session,
}

/// Errors raised by a [`StorageBackend`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot hold the value.
    #[error("storage quota exceeded writing {key} ({requested} bytes, {available} available)")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Bytes required
        requested: usize,
        /// Bytes left
        available: usize,
    },

    /// The key cannot be mapped to the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Filesystem failure.
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// Another user of the backend panicked while holding its lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Raw string storage.
#[mockall::automock]
pub trait StorageBackend: Send + Sync {
    /// Read the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the value cannot be stored.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether `key` holds a value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn contains(&self, key: &str) -> Result<bool, StorageError>;
}

/// In-memory backend with an optional size quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<FxHashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Unbounded memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory backend that holds at most `bytes` of keys and values.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(bytes),
        }
    }

    fn entries(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, FxHashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_err| StorageError::Poisoned)
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries()?;

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();

            let requested = key.len() + value.len();
            let available = quota.saturating_sub(used);

            if requested > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    available,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries()?.remove(key);

        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries()?.contains_key(key))
    }
}

/// Directory-backed backend: one `{key}.json` file per key.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Storage directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        // Readers only ever see a complete file.
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.path_for(key)?.is_file())
    }
}

/// JSON key/value store over a durable and a session backend.
#[derive(Clone)]
pub struct PersistentStore {
    durable: Arc<dyn StorageBackend>,
    session: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

impl Default for PersistentStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PersistentStore {
    /// Create a store from explicit backends.
    pub fn new(durable: Arc<dyn StorageBackend>, session: Arc<dyn StorageBackend>) -> Self {
        Self { durable, session }
    }

    /// Both scopes held in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), Arc::new(MemoryBackend::new()))
    }

    /// Durable scope on disk under `root`, session scope in memory.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the directory cannot be created.
    pub fn on_disk(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Ok(Self::new(
            Arc::new(FileBackend::open(root)?),
            Arc::new(MemoryBackend::new()),
        ))
    }

    fn backend(&self, scope: StorageScope) -> &dyn StorageBackend {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Session => self.session.as_ref(),
        }
    }

    /// Serialize and store `value` under `key`. Failures are logged, not returned.
    pub fn set<T: Serialize + ?Sized>(&self, scope: StorageScope, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(error) => {
                warn!(?scope, key, %error, "failed to serialize value for storage");
                return;
            }
        };

        match self.backend(scope).set(key, &json) {
            Ok(()) => debug!(?scope, key, bytes = json.len(), "stored value"),
            Err(error) => warn!(?scope, key, %error, "failed to write value to storage"),
        }
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Missing keys, backend failures and undecodable values all return `None`.
    pub fn get<T: DeserializeOwned>(&self, scope: StorageScope, key: &str) -> Option<T> {
        let raw = match self.backend(scope).get(key) {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(?scope, key, %error, "failed to read value from storage");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(?scope, key, %error, "discarding undecodable stored value");
                None
            }
        }
    }

    /// Like [`PersistentStore::get`], returning `default` when nothing usable is stored.
    pub fn get_or<T: DeserializeOwned>(&self, scope: StorageScope, key: &str, default: T) -> T {
        self.get(scope, key).unwrap_or(default)
    }

    /// Delete `key`. Failures are logged, not returned.
    pub fn remove(&self, scope: StorageScope, key: &str) {
        if let Err(error) = self.backend(scope).remove(key) {
            warn!(?scope, key, %error, "failed to remove value from storage");
        }
    }

    /// Whether `key` holds a value; backend failures count as absent.
    pub fn has(&self, scope: StorageScope, key: &str) -> bool {
        self.backend(scope).contains(key).unwrap_or_else(|error| {
            warn!(?scope, key, %error, "failed to check storage key");
            false
        })
    }
}
