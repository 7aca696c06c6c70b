//! Pushed-event observer interface
//!
//! The gateway delivers asynchronous events (SDP answers, ICE state,
//! media notifications, plugin events) through the long-poll loop. A
//! client has at most one registered observer; it receives every
//! non-keep-alive event exactly once, in arrival order.

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::SignalingMessage;

/// Receiver for events pushed by the gateway
///
/// `on_event` is awaited to completion before the next event is
/// delivered, so implementations see events strictly in receipt order.
/// A returned error is logged by the poll loop and does not stop event
/// delivery.
#[async_trait]
pub trait EventObserver: Send + Sync {
    /// Handle one pushed event
    async fn on_event(&self, event: SignalingMessage) -> Result<()>;
}


#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::error::Error;

    /// Observer that records every delivered event
    pub(crate) struct CollectingObserver {
        pub(crate) events: Mutex<Vec<SignalingMessage>>,
    }

    impl CollectingObserver {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(CollectingObserver {
                events: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn kinds(&self) -> Vec<String> {
            self.events
                .lock()
                .iter()
                .map(|event| event.kind.to_string())
                .collect()
        }
    }

    #[async_trait]
    impl EventObserver for CollectingObserver {
        async fn on_event(&self, event: SignalingMessage) -> Result<()> {
            self.events.lock().push(event);
            Ok(())
        }
    }

    /// Observer that fails on every event
    pub(crate) struct FailingObserver;

    #[async_trait]
    impl EventObserver for FailingObserver {
        async fn on_event(&self, _event: SignalingMessage) -> Result<()> {
            Err(Error::UnexpectedResponse("observer failure".to_string()))
        }
    }
}
