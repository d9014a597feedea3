//! In-memory key-value store.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, instrument};

use reqip_core::error::Result;
use reqip_core::traits::KeyValueStore;

/// In-memory key-value store.
///
/// Thread-safe; contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the value under `key` without going through the async API.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores `value` under `key` synchronously. Useful for seeding.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes `key`, returning the previous value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    #[instrument(skip(self, value))]
    async fn save(&self, key: &str, value: &str) -> Result<()> {
        debug!(len = value.len(), "Saving entry");
        self.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.load("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemoryStore::new();

        store.save("ip", "203.0.113.7").await.unwrap();
        store.save("ip", "203.0.113.8").await.unwrap();

        assert_eq!(store.load("ip").await.unwrap(), Some("203.0.113.8".into()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = MemoryStore::new();
        store.insert("a", "1");
        store.insert("b", "2");

        assert_eq!(store.remove("a"), Some("1".into()));
        assert_eq!(store.load("a").await.unwrap(), None);

        store.clear();
        assert!(store.is_empty());
    }
}
