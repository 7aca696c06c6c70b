//! Gateway client: command dispatch and lifecycle
//!
//! `JanusClient` is the public surface of the crate. It turns logical
//! intents (create a session, attach a plugin, send an offer, trickle a
//! candidate) into correlated request/response exchanges, applies lifecycle
//! side effects on success responses, and owns the background long-poll
//! task that delivers gateway-pushed events to the registered observer.

mod poller;
mod session;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::events::EventObserver;
use crate::protocol::{IceCandidate, Jsep, MessageKind, SignalingMessage};
use crate::transport::{HttpTransport, Transport};

pub use session::{HandleId, SessionId};
use session::SessionState;

/// State shared between the dispatcher and the poll loop
pub(crate) struct Shared {
    pub(crate) config: GatewayConfig,
    pub(crate) base_url: String,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) session: SessionState,
    pub(crate) observer: RwLock<Option<Arc<dyn EventObserver>>>,
    pub(crate) stopped: AtomicBool,
    pub(crate) stop_notify: Notify,
}

/// Async client for the gateway's REST signaling API
///
/// Construction spawns the long-poll task, which idles until a session is
/// created; `shutdown()` stops it. Must be created inside a Tokio runtime.
pub struct JanusClient {
    shared: Arc<Shared>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl JanusClient {
    /// Create a client for the configured gateway and start its poll loop
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
        Self::with_transport(config, transport)
    }

    /// Create a client over a custom transport
    pub(crate) fn with_transport(
        config: GatewayConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let base_url = config.base_url()?.to_string();
        let shared = Arc::new(Shared {
            config,
            base_url,
            transport,
            session: SessionState::new(),
            observer: RwLock::new(None),
            stopped: AtomicBool::new(false),
            stop_notify: Notify::new(),
        });

        let poll_task = tokio::spawn(poller::run(shared.clone()));
        info!(gateway = %shared.base_url, "gateway client started");

        Ok(JanusClient {
            shared,
            poll_task: Mutex::new(Some(poll_task)),
        })
    }

    // ========================================================================
    // Command exchanges
    // ========================================================================

    /// Create a gateway session
    ///
    /// On success the new session id is stored and the poll loop begins
    /// long-polling the session endpoint for pushed events.
    pub async fn create_session(&self) -> Result<SignalingMessage> {
        let request = SignalingMessage::request(MessageKind::Create, fresh_transaction());
        let response = self.exchange(self.shared.base_url.clone(), request).await?;

        let id = response.data_id().ok_or_else(|| {
            Error::UnexpectedResponse("create response carries no session id".to_string())
        })?;
        self.shared.session.set_session(id);
        info!(session_id = id, "gateway session established");

        Ok(response)
    }

    /// Attach a plugin handle inside the current session
    pub async fn attach_handle(&self, plugin: &str) -> Result<SignalingMessage> {
        let endpoint = self.session_endpoint().ok_or(Error::NoSession)?;
        let request = SignalingMessage::request(MessageKind::Attach, fresh_transaction())
            .with_plugin(plugin);
        let response = self.exchange(endpoint, request).await?;

        let id = response.data_id().ok_or_else(|| {
            Error::UnexpectedResponse("attach response carries no handle id".to_string())
        })?;
        self.shared.session.set_handle(id);
        info!(handle_id = id, plugin, "plugin handle attached");

        Ok(response)
    }

    /// Send a plugin-directed command body through the current handle
    pub async fn send_body(&self, body: Map<String, Value>) -> Result<SignalingMessage> {
        let endpoint = self.require_handle_endpoint()?;
        let request = SignalingMessage::request(MessageKind::Message, fresh_transaction())
            .with_body(body);
        self.exchange(endpoint, request).await
    }

    /// Send an SDP offer with the given media directions
    pub async fn send_offer(
        &self,
        sdp: &str,
        audio: bool,
        video: bool,
    ) -> Result<SignalingMessage> {
        let endpoint = self.require_handle_endpoint()?;

        let mut body = Map::new();
        body.insert("request".to_string(), json!("configure"));
        body.insert("audio".to_string(), json!(audio));
        body.insert("video".to_string(), json!(video));

        let request = SignalingMessage::request(MessageKind::Message, fresh_transaction())
            .with_body(body)
            .with_jsep(Jsep::offer(sdp));
        self.exchange(endpoint, request).await
    }

    /// Trickle one ICE candidate through the current handle
    pub async fn send_candidate(
        &self,
        sdp_mid: &str,
        sdp_mline_index: u16,
        candidate: &str,
    ) -> Result<SignalingMessage> {
        let endpoint = self.require_handle_endpoint()?;
        let request = SignalingMessage::request(MessageKind::Trickle, fresh_transaction())
            .with_candidate(IceCandidate {
                candidate: candidate.to_string(),
                sdp_mid: Some(sdp_mid.to_string()),
                sdp_mline_index: Some(sdp_mline_index),
            });
        self.exchange(endpoint, request).await
    }

    /// Detach the current plugin handle
    pub async fn detach_handle(&self) -> Result<SignalingMessage> {
        let endpoint = self.require_handle_endpoint()?;
        let request = SignalingMessage::request(MessageKind::Detach, fresh_transaction());
        let response = self.exchange(endpoint, request).await?;

        self.shared.session.clear_handle();
        info!("plugin handle detached");

        Ok(response)
    }

    /// Destroy the current session
    ///
    /// On success the session and handle ids are cleared and the poll loop
    /// returns to idle; the loop itself keeps running and will serve a
    /// later session on this client. On failure the ids are left unchanged.
    pub async fn destroy_session(&self) -> Result<SignalingMessage> {
        let endpoint = self.session_endpoint().ok_or(Error::NoSession)?;
        let request = SignalingMessage::request(MessageKind::Destroy, fresh_transaction());
        let response = self.exchange(endpoint, request).await?;

        self.shared.session.clear_session();
        info!("gateway session destroyed");

        Ok(response)
    }

    /// One correlated request/response exchange
    async fn exchange(
        &self,
        endpoint: String,
        request: SignalingMessage,
    ) -> Result<SignalingMessage> {
        debug!(kind = %request.kind, %endpoint, "sending signaling request");
        let payload = serde_json::to_string(&request)?;

        let raw = self
            .shared
            .transport
            .post(&endpoint, payload, self.shared.config.request_timeout)
            .await?;

        let response: SignalingMessage = serde_json::from_str(&raw)?;
        debug!(kind = %response.kind, "received signaling response");

        if let Some(error) = &response.error {
            return Err(Error::Gateway {
                code: error.code,
                reason: error.reason.clone(),
            });
        }

        Ok(response)
    }

    // ========================================================================
    // Observer registration
    // ========================================================================

    /// Register the pushed-event observer, replacing any previous one
    pub async fn subscribe(&self, observer: Arc<dyn EventObserver>) {
        *self.shared.observer.write().await = Some(observer);
    }

    /// Clear the pushed-event observer; subsequent events are dropped
    pub async fn unsubscribe(&self) {
        *self.shared.observer.write().await = None;
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    /// Whether a session is live
    pub fn has_session(&self) -> bool {
        self.shared.session.has_session()
    }

    /// Whether a plugin handle is attached
    pub fn has_handle(&self) -> bool {
        self.shared.session.has_handle()
    }

    /// Current session identifier
    pub fn session_id(&self) -> Option<SessionId> {
        self.shared.session.session_id()
    }

    /// Current handle identifier
    pub fn handle_id(&self) -> Option<HandleId> {
        self.shared.session.handle_id()
    }

    /// Full URL of the session endpoint, derived from the current id
    pub fn session_endpoint(&self) -> Option<String> {
        self.shared
            .session
            .session_path()
            .map(|path| format!("{}/{}", self.shared.base_url, path))
    }

    /// Full URL of the handle endpoint, derived from the current ids
    pub fn handle_endpoint(&self) -> Option<String> {
        self.shared
            .session
            .handle_path()
            .map(|path| format!("{}/{}", self.shared.base_url, path))
    }

    fn require_handle_endpoint(&self) -> Result<String> {
        if !self.shared.session.has_session() {
            return Err(Error::NoSession);
        }
        self.handle_endpoint().ok_or(Error::NoHandle)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Stop the poll loop and wait for it to finish. Idempotent; in-flight
    /// command exchanges are left to complete or time out on their own.
    pub async fn shutdown(&self) {
        let task = self.poll_task.lock().await.take();
        self.shared.stopped.store(true, Ordering::SeqCst);
        self.shared.stop_notify.notify_one();

        match task {
            Some(task) => {
                if let Err(e) = task.await {
                    warn!(error = %e, "poll task ended abnormally");
                }
                info!("gateway client shut down");
            }
            None => debug!("shutdown called more than once"),
        }
    }
}

/// Correlation token, unique per outbound request
fn fresh_transaction() -> String {
    Uuid::new_v4().to_string()
}
