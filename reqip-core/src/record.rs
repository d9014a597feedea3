//! The cached lookup state as read back from the host store.

use crate::constants::{LAST_RESPONSE_DATA_KEY, LAST_RESPONSE_TIME_KEY};
use crate::error::Result;
use crate::traits::KeyValueStore;

/// Last known address and the time it was fetched.
///
/// Both entries live under separate keys and are read independently, so
/// either may be missing (first run, or a partially failed write). Empty
/// strings are treated the same as missing values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachedRecord {
    /// Last address returned by the address-echo service
    pub address: Option<String>,
    /// ISO-8601 time of the fetch that produced `address`
    pub fetched_at: Option<String>,
}

impl CachedRecord {
    /// Builds a record from raw store values, mapping empty strings to `None`.
    pub fn from_raw(address: Option<String>, fetched_at: Option<String>) -> Self {
        Self {
            address: address.filter(|value| !value.is_empty()),
            fetched_at: fetched_at.filter(|value| !value.is_empty()),
        }
    }

    /// Reads the address entry, then the time entry, from `store`.
    ///
    /// A failing read is returned as is; the second key is not read after
    /// the first fails.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let address = store.load(LAST_RESPONSE_DATA_KEY).await?;
        let fetched_at = store.load(LAST_RESPONSE_TIME_KEY).await?;
        Ok(Self::from_raw(address, fetched_at))
    }

    /// Returns true if nothing usable was stored.
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.fetched_at.is_none()
    }

    /// Fetch time in milliseconds since the Unix epoch, if present and parseable.
    pub fn fetched_at_millis(&self) -> Option<i64> {
        self.fetched_at.as_deref().and_then(crate::timestamp::parse_millis)
    }

    /// Milliseconds elapsed between the fetch and `now_ms`.
    ///
    /// Negative when the stored time lies in the future.
    pub fn age_millis(&self, now_ms: i64) -> Option<i64> {
        self.fetched_at_millis()
            .map(|fetched_ms| now_ms.saturating_sub(fetched_ms))
    }

    /// Returns true if the cached address may be served without a fetch.
    ///
    /// Requires both entries and `now_ms - fetched_ms < retention_ms`. Equality
    /// counts as expired. An unparseable timestamp counts as expired.
    pub fn is_fresh(&self, now_ms: i64, retention_ms: u64) -> bool {
        if self.address.is_none() {
            return false;
        }

        match self.age_millis(now_ms) {
            Some(age) => i128::from(age) < i128::from(retention_ms),
            None => false,
        }
    }
}
