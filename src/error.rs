//! Error types for the gateway client

use thiserror::Error;

/// Result type alias using the client's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the gateway client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error (connection refused, timeout, TLS failure)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The gateway returned a well-formed error payload
    #[error("Gateway error {code}: {reason}")]
    Gateway {
        /// Numeric error code reported by the gateway
        code: i64,
        /// Human-readable reason reported by the gateway
        reason: String,
    },

    /// Non-success HTTP status without a decodable error payload
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    /// A well-formed response is missing an expected field
    #[error("Unexpected gateway response: {0}")]
    UnexpectedResponse(String),

    /// A session-scoped operation was called with no live session
    #[error("No active gateway session")]
    NoSession,

    /// A handle-scoped operation was called with no attached plugin handle
    #[error("No plugin handle attached")]
    NoHandle,
}

impl Error {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::UnexpectedStatus(_))
    }

    /// Check if error is a caller error (bad call order or input)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NoSession | Error::NoHandle | Error::Config(_)
        )
    }
}
