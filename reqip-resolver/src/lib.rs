//! # reqip Resolver
//!
//! Determines the caller's public IP address and keeps the last answer in a
//! host-supplied key-value store, so repeated lookups within the retention
//! window never touch the network.
//!
//! Two ways to use it:
//!
//! - **Handle**: build a [`ConfigStore`] and an [`AddressResolver`] and pass
//!   them around explicitly. Preferred for libraries and tests.
//! - **Process-wide**: call [`initialize`] once at startup and [`request_ip`]
//!   anywhere afterwards.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reqip_resolver::{initialize, request_ip, ResolverConfig};
//! use reqip_store::MemoryStore;
//!
//! initialize(ResolverConfig::new(Arc::new(MemoryStore::new()), 60_000));
//!
//! match request_ip().await? {
//!     Some(ip) => println!("public address: {ip}"),
//!     None => println!("address could not be determined"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod resolver;

#[cfg(test)]
mod test_utils;

use std::sync::OnceLock;

pub use config::{ConfigStore, ResolverConfig};
pub use resolver::AddressResolver;

pub use reqip_core::error::{ReqIpError, Result};
pub use reqip_core::record::CachedRecord;

/// Sets the process-wide configuration. Re-initializing replaces it.
pub fn initialize(config: ResolverConfig) {
    ConfigStore::global().initialize(config);
}

/// Resolves the public address using the process-wide configuration.
///
/// Fails with [`ReqIpError::NotInitialized`] before [`initialize`] is called.
pub async fn request_ip() -> Result<Option<String>> {
    global_resolver().request_ip().await
}

fn global_resolver() -> &'static AddressResolver {
    static RESOLVER: OnceLock<AddressResolver> = OnceLock::new();
    RESOLVER.get_or_init(|| AddressResolver::new(ConfigStore::global().clone()))
}
