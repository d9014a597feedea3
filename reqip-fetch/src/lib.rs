//! # reqip Fetch
//!
//! HTTP [`AddressSource`] backed by an address-echo service such as ipify.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod ipify;

pub use ipify::{IpifyClient, IpifyConfig};

pub use reqip_core::traits::AddressSource;
