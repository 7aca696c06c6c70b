//! Configuration for the gateway client
//!
//! Carries the gateway address, request/poll timeouts, and polling pace.
//! All fields have serde defaults so a minimal config is just a host name;
//! environment variables can overlay a deserialized or built config.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Gateway connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway host name or IP address
    pub host: String,
    /// Gateway port
    #[serde(default = "default_port")]
    pub port: u16,
    /// URL scheme ("http" or "https")
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Root path of the signaling API
    #[serde(default = "default_root")]
    pub root: String,
    /// Timeout for command request/response exchanges
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Timeout for one long-poll read; must exceed `request_timeout`
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub poll_timeout: Duration,
    /// Pause between poll cycles
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Pause after a failed poll cycle before the next attempt
    #[serde(default = "default_poll_retry_delay", with = "humantime_serde")]
    pub poll_retry_delay: Duration,
    /// Accept TLS certificates that fail validation. Off by default;
    /// only enable against a gateway whose certificate you control.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_port() -> u16 {
    8089
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_root() -> String {
    "janus".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(8)
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_poll_retry_delay() -> Duration {
    Duration::from_millis(250)
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            host: "localhost".to_string(),
            port: default_port(),
            scheme: default_scheme(),
            root: default_root(),
            request_timeout: default_request_timeout(),
            poll_timeout: default_poll_timeout(),
            poll_interval: default_poll_interval(),
            poll_retry_delay: default_poll_retry_delay(),
            accept_invalid_certs: false,
        }
    }
}

impl GatewayConfig {
    /// Create a config for the given host with default settings
    pub fn new(host: impl Into<String>) -> Self {
        GatewayConfig {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Set the gateway port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the URL scheme
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the command exchange timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the long-poll timeout
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Opt in to accepting invalid TLS certificates
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the base gateway URL, e.g. `https://host:8089/janus`
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!(
            "{}://{}:{}/{}",
            self.scheme,
            self.host,
            self.port,
            self.root.trim_matches('/')
        );
        Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid gateway URL {}: {}", raw, e)))
    }

    /// Apply environment variable overrides to an existing config.
    ///
    /// Recognized variables: `JANUS_HOST`, `JANUS_PORT`, `JANUS_SCHEME`,
    /// `JANUS_ACCEPT_INVALID_CERTS`. Env vars have the highest precedence.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("JANUS_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("JANUS_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(scheme) = std::env::var("JANUS_SCHEME") {
            self.scheme = scheme;
        }
        if let Ok(accept) = std::env::var("JANUS_ACCEPT_INVALID_CERTS") {
            self.accept_invalid_certs = accept == "1" || accept.eq_ignore_ascii_case("true");
        }
    }

    /// Validate the configuration before building a client
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::Config("Gateway host must not be empty".to_string()));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(Error::Config(format!(
                "Unsupported scheme: {}",
                self.scheme
            )));
        }
        if self.poll_timeout <= self.request_timeout {
            return Err(Error::Config(
                "poll_timeout must exceed request_timeout".to_string(),
            ));
        }
        self.base_url()?;
        Ok(())
    }
}
