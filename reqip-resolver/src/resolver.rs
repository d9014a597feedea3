//! Cache-aware public address resolution.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use reqip_core::constants::{LAST_RESPONSE_DATA_KEY, LAST_RESPONSE_TIME_KEY};
use reqip_core::error::{ReqIpError, Result};
use reqip_core::record::CachedRecord;
use reqip_core::timestamp;
use reqip_core::traits::{AddressSource, Clock, KeyValueStore, SystemClock};
use reqip_fetch::IpifyClient;

use crate::config::ConfigStore;

/// Resolves the public address, serving it from the host store while fresh.
///
/// Each call:
/// 1. Fails with `NotInitialized` if no configuration is active
/// 2. Loads the cached address, then the cached fetch time
/// 3. Returns the cached address if it is younger than the retention window
/// 4. Otherwise fetches once; on success persists address + time and returns it
/// 5. On fetch failure returns the cached address (possibly stale) or `None`
///
/// Storage errors are never swallowed. Concurrent calls are not coalesced:
/// two calls racing past an expired cache both fetch, and the last write wins.
#[derive(Clone)]
pub struct AddressResolver {
    configs: ConfigStore,
    source: Arc<dyn AddressSource>,
    clock: Arc<dyn Clock>,
}

impl AddressResolver {
    /// Creates a resolver querying `https://api.ipify.org/` on the system clock.
    pub fn new(configs: ConfigStore) -> Self {
        Self::from_source(configs, Arc::new(IpifyClient::new()))
    }

    /// Creates a resolver over `source` on the system clock.
    pub fn from_source(configs: ConfigStore, source: Arc<dyn AddressSource>) -> Self {
        Self {
            configs,
            source,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the address source.
    pub fn with_source(mut self, source: Arc<dyn AddressSource>) -> Self {
        self.source = source;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration store this resolver reads from.
    pub fn configs(&self) -> &ConfigStore {
        &self.configs
    }

    /// Resolves the caller's public address.
    ///
    /// Returns `Ok(None)` when no address could be determined from any source.
    #[instrument(skip(self))]
    pub async fn request_ip(&self) -> Result<Option<String>> {
        let config = self.configs.current()?;
        let store = config.store.as_ref();

        let record = CachedRecord::load(store).await?;

        let now_ms = self.clock.now_millis();
        if record.is_fresh(now_ms, config.retention_ms) {
            debug!(age_ms = ?record.age_millis(now_ms), "Serving cached address");
            return Ok(record.address);
        }

        let fetched = self.source.fetch_address().await.and_then(|address| {
            if address.is_empty() {
                Err(ReqIpError::EmptyResponse)
            } else {
                Ok(address)
            }
        });

        match fetched {
            Ok(address) => {
                self.persist(store, &address).await?;
                info!(%address, "Resolved fresh address");
                Ok(Some(address))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    has_cached = record.address.is_some(),
                    "Address fetch failed, falling back to cached address"
                );
                Ok(record.address)
            }
        }
    }

    /// Reads the cached record without touching the network.
    pub async fn cached(&self) -> Result<CachedRecord> {
        let config = self.configs.current()?;
        CachedRecord::load(config.store.as_ref()).await
    }

    /// Writes the address and the current time. Both writes are issued
    /// together and both must finish before returning.
    async fn persist(&self, store: &dyn KeyValueStore, address: &str) -> Result<()> {
        let fetched_at = timestamp::format(self.clock.now());

        futures::try_join!(
            store.save(LAST_RESPONSE_DATA_KEY, address),
            store.save(LAST_RESPONSE_TIME_KEY, &fetched_at),
        )?;

        debug!(%fetched_at, "Persisted fetched address");
        Ok(())
    }
}
