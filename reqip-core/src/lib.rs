//! # reqip Core
//!
//! Core types, errors, and traits for cached public IP address lookup.
//!
//! This crate provides the building blocks shared by the other reqip crates:
//!
//! - **Constants**: Persistence keys and the default address-echo endpoint
//! - **Errors**: The error taxonomy for lookups, storage, and transport
//! - **Traits**: The seams a host plugs into (storage, address source, clock)
//! - **Record**: The cached address + timestamp pair and its freshness rule
//!
//! ## Example
//!
//! ```rust
//! use reqip_core::{timestamp, CachedRecord};
//!
//! let record = CachedRecord::from_raw(
//!     Some("203.0.113.7".into()),
//!     Some("1970-01-01T00:00:00.100Z".into()),
//! );
//! assert!(record.is_fresh(900, 1000));
//! assert!(!record.is_fresh(1100, 1000));
//! assert_eq!(timestamp::parse_millis("1970-01-01T00:00:00.100Z"), Some(100));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod record;
pub mod timestamp;
pub mod traits;

pub use constants::*;
pub use error::{ReqIpError, Result};
pub use record::CachedRecord;
pub use traits::*;
