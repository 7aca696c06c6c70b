//! # Janus Gateway Client
//!
//! Async REST signaling client for the Janus WebRTC media gateway.
//!
//! ## Features
//!
//! - **Session lifecycle:** create a gateway session, attach a plugin
//!   handle, detach, destroy
//! - **Signaling exchanges:** plugin command bodies, SDP offers, trickled
//!   ICE candidates, each as one correlated request/response
//! - **Event delivery:** a background long-poll loop forwards every
//!   gateway-pushed event to a single observer, in order, with transport
//!   keep-alives filtered out
//! - **Explicit lifecycle:** the poll task is owned by the client, started
//!   at construction and stopped by an idempotent `shutdown()`
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use janus_gateway_client::{GatewayConfig, JanusClient};
//!
//! # struct Printer;
//! # #[async_trait::async_trait]
//! # impl janus_gateway_client::EventObserver for Printer {
//! #     async fn on_event(
//! #         &self,
//! #         event: janus_gateway_client::SignalingMessage,
//! #     ) -> janus_gateway_client::Result<()> {
//! #         println!("{}", event.kind);
//! #         Ok(())
//! #     }
//! # }
//! # async fn run() -> janus_gateway_client::Result<()> {
//! let client = JanusClient::new(GatewayConfig::new("gateway.example.org"))?;
//! client.subscribe(Arc::new(Printer)).await;
//!
//! client.create_session().await?;
//! client.attach_handle("janus.plugin.videoroom").await?;
//! client.send_offer("v=0...", true, true).await?;
//!
//! client.destroy_session().await?;
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod protocol;
pub mod transport;

pub use client::{HandleId, JanusClient, SessionId};
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use events::EventObserver;
pub use protocol::{MessageKind, SignalingMessage};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
