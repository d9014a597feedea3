//! Common traits for reqip.
//!
//! These are the seams a host application plugs into: where the last result
//! is persisted, where a fresh address comes from, and what time it is.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Host-supplied key-value persistence.
///
/// Implementations might use:
/// - In-memory maps (for testing/development)
/// - A JSON file on disk
/// - Browser/mobile local storage behind FFI
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Loads the value stored under `key`.
    ///
    /// A key that was never written is `Ok(None)`, not an error.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Persists `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the caller's current public address.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Makes a single attempt to determine the address. No retries.
    async fn fetch_address(&self) -> Result<String>;
}

#[async_trait]
impl<T: AddressSource + ?Sized> AddressSource for Arc<T> {
    async fn fetch_address(&self) -> Result<String> {
        (**self).fetch_address().await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Wall-clock time source.
pub trait Clock: Send + Sync {
    /// Current time in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
