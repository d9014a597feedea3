//! Error types for reqip.
//!
//! Errors fall into two families that the resolver treats differently:
//! fetch failures (network path) are recovered locally by falling back to the
//! cached address, while storage failures always reach the caller.

use thiserror::Error;

/// Result type alias using `ReqIpError`.
pub type Result<T> = std::result::Result<T, ReqIpError>;

/// Main error type for all reqip operations.
#[derive(Debug, Error)]
pub enum ReqIpError {
    // ═══════════════════════════════════════════════════════════════════════════
    // LIFECYCLE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A lookup was requested before any configuration was initialized.
    #[error("Module is not initialized.")]
    NotInitialized,

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The host store failed to read a key.
    #[error("Failed to load '{key}': {reason}")]
    StorageRead {
        /// Key being read
        key: String,
        /// Backend-specific reason
        reason: String,
    },

    /// The host store failed to write a key.
    #[error("Failed to save '{key}': {reason}")]
    StorageWrite {
        /// Key being written
        key: String,
        /// Backend-specific reason
        reason: String,
    },

    /// Stored data could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Underlying filesystem error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // FETCH ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The address-echo service answered with an empty body.
    #[error("Ip could not be determined.")]
    EmptyResponse,

    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The address-echo service answered with a non-success status.
    #[error("HTTP request returned status {0}")]
    HttpStatus(u16),
}

impl ReqIpError {
    /// Builds a [`ReqIpError::StorageRead`] for `key`.
    pub fn storage_read(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::StorageRead {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a [`ReqIpError::StorageWrite`] for `key`.
    pub fn storage_write(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::StorageWrite {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error came from the network path.
    ///
    /// These are the only errors the resolver swallows.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ReqIpError::EmptyResponse | ReqIpError::HttpError(_) | ReqIpError::HttpStatus(_)
        )
    }

    /// Returns true if the error came from the persistence layer.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            ReqIpError::StorageRead { .. }
                | ReqIpError::StorageWrite { .. }
                | ReqIpError::SerializationError(_)
                | ReqIpError::IoError(_)
        )
    }
}
