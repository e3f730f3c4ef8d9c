//! Transport ports: request pre-processing, execution and cancellation.

use std::future::Future;

use meridian_domain::{RequestData, TransportResponse};
use tokio::sync::watch;

/// Errors reported by the transport collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request was aborted.
    #[error("Request aborted")]
    Aborted,

    /// The request timed out.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Pre-processing the request failed.
    #[error("Unable to prepare request: {0}")]
    Processing(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Prepares a draft request for transport.
///
/// Implementations apply variables and request actions. The returned
/// request is what the runner receives.
pub trait RequestProcessor: Send + Sync + 'static {
    /// Processes the draft.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be prepared.
    fn process(
        &self,
        request: RequestData,
    ) -> impl Future<Output = Result<RequestData, TransportError>> + Send;
}

/// Executes requests on behalf of the workspace.
///
/// Requests are keyed by the editor request id. Several may be in flight
/// at once and they may complete in any order.
pub trait RequestRunner: Send + Sync + 'static {
    /// Runs the request.
    ///
    /// `Ok(None)` means the runner produced no result (cancelled upstream,
    /// timed out without a response).
    ///
    /// # Errors
    ///
    /// Returns an error when the transport fails.
    fn run(
        &self,
        id: &str,
        request: &RequestData,
    ) -> impl Future<Output = Result<Option<TransportResponse>, TransportError>> + Send;

    /// Cancels the request with the given id.
    ///
    /// This is a best-effort operation; the request may still complete
    /// if it was already in flight.
    fn abort(&self, id: &str) -> impl Future<Output = ()> + Send;
}

/// Sender half of a cancellation pair.
#[derive(Debug)]
pub struct CancellationToken {
    sender: watch::Sender<bool>,
}

/// Receiver half of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a connected token/receiver pair.
    #[must_use]
    pub fn new() -> (Self, CancellationReceiver) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, CancellationReceiver { receiver })
    }

    /// Signals cancellation.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once `cancel` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl CancellationReceiver {
    /// Completes when the paired token is cancelled.
    ///
    /// Never completes if the token is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if self.receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
