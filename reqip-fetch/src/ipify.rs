//! Address-echo client.
//!
//! Issues one plain GET per lookup and returns the response body as the
//! address. No retries, no parsing of the body, no header inspection.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use reqip_core::constants::DEFAULT_ENDPOINT;
use reqip_core::error::{ReqIpError, Result};
use reqip_core::traits::AddressSource;

/// Address-echo client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpifyConfig {
    /// Endpoint answering with the caller's address as plain text
    pub endpoint: String,
    /// Request timeout in seconds. `None` leaves the transport default in place.
    pub timeout_seconds: Option<u64>,
}

impl Default for IpifyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_seconds: None,
        }
    }
}

impl IpifyConfig {
    /// Creates a config pointing at a custom endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Sets a request timeout.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }
}

/// HTTP client for the address-echo service.
#[derive(Clone, Debug)]
pub struct IpifyClient {
    endpoint: String,
    http_client: reqwest::Client,
}

impl IpifyClient {
    /// Creates a client for `https://api.ipify.org/` with transport defaults.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: IpifyConfig) -> Result<Self> {
        url::Url::parse(&config.endpoint)
            .map_err(|e| ReqIpError::ConfigError(format!("invalid endpoint '{}': {}", config.endpoint, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http_client = builder
            .build()
            .map_err(|e| ReqIpError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint,
            http_client,
        })
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for IpifyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressSource for IpifyClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_address(&self) -> Result<String> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| ReqIpError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReqIpError::HttpStatus(status.as_u16()));
        }

        let address = response
            .text()
            .await
            .map_err(|e| ReqIpError::HttpError(e.to_string()))?;

        if address.is_empty() {
            return Err(ReqIpError::EmptyResponse);
        }

        debug!(%address, "Fetched address");
        Ok(address)
    }
}
