//! Long-poll event loop
//!
//! One background task per client, started at construction and stopped by
//! `shutdown()`. The loop idles while no session exists, and while a
//! session is live it keeps exactly one poll request in flight, forwarding
//! every non-keep-alive event to the registered observer in receipt order.
//! Poll failures are absorbed here; nothing in this module propagates an
//! error to the caller.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::Shared;
use crate::error::Result;
use crate::protocol::SignalingMessage;

pub(crate) async fn run(shared: Arc<Shared>) {
    info!("event poll loop started");

    loop {
        if shared.stopped.load(Ordering::SeqCst) {
            break;
        }

        // Idle until a session exists
        let Some(path) = shared.session.session_path() else {
            if pause(&shared, shared.config.poll_interval).await {
                break;
            }
            continue;
        };

        let endpoint = format!("{}/{}?maxev=1", shared.base_url, path);
        let outcome = tokio::select! {
            outcome = poll_once(&shared, &endpoint) => outcome,
            _ = shared.stop_notify.notified() => break,
        };

        let delay = match outcome {
            Ok(()) => shared.config.poll_interval,
            Err(e) => {
                warn!(error = %e, "poll cycle failed");
                shared.config.poll_retry_delay
            }
        };

        if pause(&shared, delay).await {
            break;
        }
    }

    info!("event poll loop stopped");
}

/// One poll cycle: read, decode, filter, forward
async fn poll_once(shared: &Shared, endpoint: &str) -> Result<()> {
    let raw = shared
        .transport
        .get(endpoint, shared.config.poll_timeout)
        .await?;

    let event: SignalingMessage = serde_json::from_str(&raw)?;

    if event.is_keepalive() {
        debug!("keep-alive");
        return Ok(());
    }

    let observer = shared.observer.read().await.clone();
    match observer {
        Some(observer) => {
            let kind = event.kind.clone();
            if let Err(e) = observer.on_event(event).await {
                warn!(%kind, error = %e, "event observer failed");
            }
        }
        None => debug!(kind = %event.kind, "event dropped, no observer registered"),
    }

    Ok(())
}

/// Sleep for `delay`, waking early on the stop signal.
/// Returns true when the stop signal arrived.
async fn pause(shared: &Shared, delay: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = shared.stop_notify.notified() => true,
    }
}
