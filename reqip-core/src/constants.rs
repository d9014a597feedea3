//! Fixed keys and endpoints.
//!
//! The persistence keys are shared with every existing deployment of the
//! lookup and must match byte for byte, including the `respose` spelling.

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Key under which the last fetched address is stored.
pub const LAST_RESPONSE_DATA_KEY: &str = "codexporer.io-request_ip-last_respose_data";

/// Key under which the ISO-8601 time of the last successful fetch is stored.
pub const LAST_RESPONSE_TIME_KEY: &str = "codexporer.io-request_ip-last_respose_time";

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK
// ═══════════════════════════════════════════════════════════════════════════════

/// Address-echo service queried on a cache miss. Responds with a plain-text body.
pub const DEFAULT_ENDPOINT: &str = "https://api.ipify.org/";
