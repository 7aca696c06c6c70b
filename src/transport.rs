//! HTTP transport for the signaling API
//!
//! One `reqwest::Client` is built at construction and shared by command
//! exchanges and the long-poll loop; each call carries its own timeout so
//! a held-open poll never delays a concurrent command.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{Error, Result};

/// Abstract request/response transport to the gateway
///
/// Implemented over HTTP in production; test code substitutes scripted
/// implementations to drive the dispatcher and poll loop deterministically.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON payload, returning the raw response body
    async fn post(&self, endpoint: &str, payload: String, timeout: Duration) -> Result<String>;

    /// Blocking read for pushed events; the gateway holds the connection
    /// open up to `timeout` waiting for an event
    async fn get(&self, endpoint: &str, timeout: Duration) -> Result<String>;
}

/// HTTP transport over a shared reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the transport from gateway configuration
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.request_timeout);

        if config.accept_invalid_certs {
            warn!("TLS certificate validation disabled by configuration");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;
        Ok(HttpTransport { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &str, payload: String, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .post(endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, endpoint, "request rejected");
            return Err(Error::UnexpectedStatus(status));
        }

        Ok(response.text().await?)
    }

    async fn get(&self, endpoint: &str, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(endpoint)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, endpoint, "poll rejected");
            return Err(Error::UnexpectedStatus(status));
        }

        Ok(response.text().await?)
    }
}
