//! # reqip Store
//!
//! Reference [`KeyValueStore`] backends for the cached address lookup.
//!
//! Hosts normally bring their own persistence; these cover the common cases:
//!
//! - **Memory**: Process-local map for tests and short-lived tools
//! - **File**: JSON file on disk, rewritten atomically on every save
//!
//! ## Example
//!
//! ```rust,ignore
//! use reqip_store::FileStore;
//!
//! let store = FileStore::open("reqip-cache.json").await?;
//! store.save("key", "value").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub use reqip_core::traits::KeyValueStore;
