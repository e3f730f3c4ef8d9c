//! Transport lifecycle events.

use std::sync::Arc;

use meridian_domain::{RequestData, TransportRequest, TransportResponse};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Lifecycle notification for one request, keyed by editor request id.
///
/// Consumers filter by [`TransportEvent::id`]; completion order across
/// different ids is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A send was accepted and is being prepared.
    Requested {
        /// Editor request id.
        id: String,
    },
    /// The request was processed and handed to the runner.
    Ready {
        /// Editor request id.
        id: String,
        /// The processed request.
        request: Box<RequestData>,
    },
    /// The request finished, failed or was aborted.
    Response {
        /// Editor request id.
        id: String,
        /// What was actually sent, if the request reached the runner.
        request: Option<TransportRequest>,
        /// The response, synthetic for failures.
        response: TransportResponse,
    },
}

impl TransportEvent {
    /// The request id this event belongs to.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Requested { id } | Self::Ready { id, .. } | Self::Response { id, .. } => id,
        }
    }

    /// Returns true for the terminal event of a request.
    #[must_use]
    pub const fn is_response(&self) -> bool {
        matches!(self, Self::Response { .. })
    }
}

/// Fans events out to every subscriber without dropping any.
///
/// Each subscriber owns an unbounded queue, so a slow consumer still sees
/// every terminal [`TransportEvent::Response`]. Closed subscribers are
/// pruned on the next emit.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<TransportEvent>>>>,
}

impl EventBus {
    /// Registers a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> TransportEvents {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().push(sender);
        TransportEvents { receiver }
    }

    /// Delivers `event` to every open subscriber.
    pub fn emit(&self, event: &TransportEvent) {
        self.subscribers
            .lock()
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

/// Receiving end of a transport event subscription.
#[derive(Debug)]
pub struct TransportEvents {
    receiver: mpsc::UnboundedReceiver<TransportEvent>,
}

impl TransportEvents {
    /// Waits for the next event. Returns `None` once the mediator is gone
    /// and every queued event was delivered.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.receiver.recv().await
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<TransportEvent> {
        self.receiver.try_recv().ok()
    }
}
