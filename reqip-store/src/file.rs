//! File-backed key-value store.
//!
//! Entries are kept in memory and the whole map is written back to disk as a
//! JSON object on every save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use reqip_core::error::{ReqIpError, Result};
use reqip_core::traits::KeyValueStore;

/// JSON file key-value store.
///
/// # File Format
///
/// ```text
/// {
///   "codexporer.io-request_ip-last_respose_data": "203.0.113.7",
///   "codexporer.io-request_ip-last_respose_time": "2024-05-01T12:30:00.250Z"
/// }
/// ```
pub struct FileStore {
    /// Path to the storage file
    path: PathBuf,
    /// In-memory view of the file
    entries: RwLock<BTreeMap<String, String>>,
    /// Serializes writers so concurrent saves never share a temp file
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store; the file is created on first save.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read(&path).await {
            Ok(contents) if contents.is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_slice(&contents)
                .map_err(|e| ReqIpError::SerializationError(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(count = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes `key` and persists the change.
    ///
    /// The entry is kept when the file cannot be written.
    pub async fn remove(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.write_lock.lock().await;
        let mut updated = self.entries.read().clone();
        let previous = updated.remove(key);
        if previous.is_some() {
            self.commit(updated).await?;
        }
        Ok(previous)
    }

    /// Removes every entry and persists the change.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.commit(BTreeMap::new()).await
    }

    /// Writes `updated` to disk, then makes it the in-memory view.
    ///
    /// On a write error the in-memory view is left untouched, so `load` keeps
    /// agreeing with the file. Callers must hold `write_lock`.
    async fn commit(&self, updated: BTreeMap<String, String>) -> Result<()> {
        self.persist(&updated).await?;
        *self.entries.write() = updated;
        Ok(())
    }

    /// Writes `entries` to disk (temp file, then rename).
    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(entries)
            .map_err(|e| ReqIpError::SerializationError(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&serialized).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        debug!(path = ?self.path, bytes = serialized.len(), "File store persisted");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    #[instrument(skip(self, value))]
    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut updated = self.entries.read().clone();
        updated.insert(key.to_string(), value.to_string());
        self.commit(updated)
            .await
            .map_err(|e| ReqIpError::storage_write(key, e))
    }
}
