//! Recording doubles for resolver tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use reqip_core::error::{ReqIpError, Result};
use reqip_core::traits::{AddressSource, Clock, KeyValueStore};

/// A store call as observed by [`RecordingStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCall {
    Load(String),
    Save(String, String),
}

/// Map-backed store that logs every call and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    values: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_loads: bool,
    fail_saves: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(address: &str, fetched_at: &str) -> Self {
        let store = Self::new();
        store.put(reqip_core::LAST_RESPONSE_DATA_KEY, address);
        store.put(reqip_core::LAST_RESPONSE_TIME_KEY, fetched_at);
        store
    }

    pub fn failing_loads(mut self) -> Self {
        self.fail_loads = true;
        self
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Load(key) => Some(key),
                StoreCall::Save(..) => None,
            })
            .collect()
    }

    pub fn saves(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Save(key, value) => Some((key, value)),
                StoreCall::Load(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        self.calls.lock().push(StoreCall::Load(key.to_string()));
        if self.fail_loads {
            return Err(ReqIpError::storage_read(key, "backend unavailable"));
        }
        Ok(self.value(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.calls
            .lock()
            .push(StoreCall::Save(key.to_string(), value.to_string()));
        if self.fail_saves {
            return Err(ReqIpError::storage_write(key, "quota exceeded"));
        }
        self.put(key, value);
        Ok(())
    }
}

/// What a [`ScriptedSource`] answers with.
#[derive(Clone, Debug)]
pub enum Reply {
    Address(String),
    Empty,
    NetworkError,
}

/// Address source with a fixed reply that counts calls.
pub struct ScriptedSource {
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn address(address: &str) -> Self {
        Self::new(Reply::Address(address.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressSource for ScriptedSource {
    async fn fetch_address(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Address(address) => Ok(address.clone()),
            Reply::Empty => Err(ReqIpError::EmptyResponse),
            Reply::NetworkError => Err(ReqIpError::HttpError("mock error".into())),
        }
    }
}

/// Clock pinned to a settable instant.
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst))
            .unwrap()
    }
}

/// Formats epoch milliseconds the way the resolver persists them.
pub fn iso(millis: i64) -> String {
    reqip_core::timestamp::format(Utc.timestamp_millis_opt(millis).unwrap())
}
