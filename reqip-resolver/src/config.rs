//! Resolver configuration and the store that holds the active one.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use reqip_core::error::{ReqIpError, Result};
use reqip_core::traits::KeyValueStore;

/// Resolver configuration: where results are persisted and for how long they stay valid.
#[derive(Clone)]
pub struct ResolverConfig {
    /// Host persistence for the cached address and fetch time
    pub store: Arc<dyn KeyValueStore>,
    /// Retention window in milliseconds. Zero means always refetch.
    pub retention_ms: u64,
}

impl ResolverConfig {
    /// Creates a config with a retention window in milliseconds.
    pub fn new(store: Arc<dyn KeyValueStore>, retention_ms: u64) -> Self {
        Self {
            store,
            retention_ms,
        }
    }

    /// Creates a config with a retention window given as a [`Duration`].
    ///
    /// Windows longer than `u64::MAX` milliseconds saturate.
    pub fn with_retention(store: Arc<dyn KeyValueStore>, retention: Duration) -> Self {
        let retention_ms = u64::try_from(retention.as_millis()).unwrap_or(u64::MAX);
        Self::new(store, retention_ms)
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("retention_ms", &self.retention_ms)
            .finish_non_exhaustive()
    }
}

/// Holder of the active [`ResolverConfig`].
///
/// Cloning yields another handle to the same slot. The last call to
/// [`ConfigStore::initialize`] wins; there is no error on re-initialization.
#[derive(Clone, Debug, Default)]
pub struct ConfigStore {
    active: Arc<RwLock<Option<Arc<ResolverConfig>>>>,
}

impl ConfigStore {
    /// Creates an empty, uninitialized store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that is already initialized with `config`.
    pub fn initialized(config: ResolverConfig) -> Self {
        let store = Self::new();
        store.initialize(config);
        store
    }

    /// The process-wide store behind [`crate::initialize`] and [`crate::request_ip`].
    pub fn global() -> &'static ConfigStore {
        static GLOBAL: OnceLock<ConfigStore> = OnceLock::new();
        GLOBAL.get_or_init(ConfigStore::new)
    }

    /// Replaces the active configuration unconditionally.
    pub fn initialize(&self, config: ResolverConfig) {
        debug!(retention_ms = config.retention_ms, "Initializing resolver configuration");
        *self.active.write() = Some(Arc::new(config));
    }

    /// Returns the active configuration.
    pub fn current(&self) -> Result<Arc<ResolverConfig>> {
        self.active.read().clone().ok_or(ReqIpError::NotInitialized)
    }

    /// Returns true once [`ConfigStore::initialize`] has been called.
    pub fn is_initialized(&self) -> bool {
        self.active.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqip_store::MemoryStore;

    #[test]
    fn test_uninitialized() {
        let configs = ConfigStore::new();
        assert!(!configs.is_initialized());
        assert!(matches!(configs.current(), Err(ReqIpError::NotInitialized)));
    }

    #[test]
    fn test_last_initialization_wins() {
        let configs = ConfigStore::new();
        configs.initialize(ResolverConfig::new(Arc::new(MemoryStore::new()), 1000));
        configs.initialize(ResolverConfig::new(Arc::new(MemoryStore::new()), 5000));

        assert!(configs.is_initialized());
        assert_eq!(configs.current().unwrap().retention_ms, 5000);
    }

    #[test]
    fn test_clones_share_slot() {
        let configs = ConfigStore::new();
        let handle = configs.clone();

        handle.initialize(ResolverConfig::new(Arc::new(MemoryStore::new()), 42));
        assert_eq!(configs.current().unwrap().retention_ms, 42);
    }

    #[test]
    fn test_retention_from_duration() {
        let config = ResolverConfig::with_retention(Arc::new(MemoryStore::new()), Duration::from_secs(60));
        assert_eq!(config.retention_ms, 60_000);

        let config = ResolverConfig::with_retention(Arc::new(MemoryStore::new()), Duration::MAX);
        assert_eq!(config.retention_ms, u64::MAX);
    }

    #[test]
    fn test_debug_hides_store() {
        let config = ResolverConfig::new(Arc::new(MemoryStore::new()), 7);
        assert_eq!(format!("{:?}", config), "ResolverConfig { retention_ms: 7, .. }");
    }
}
