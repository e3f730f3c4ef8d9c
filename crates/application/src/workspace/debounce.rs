//! Trailing debounce for workspace persistence.

use std::sync::Arc;
use std::time::Duration;

use meridian_domain::Workspace;
use tokio::task::JoinHandle;

use crate::ports::WorkspaceStore;

/// Collapses bursts of store requests into one trailing write.
///
/// Each call to [`StoreDebouncer::schedule`] aborts the pending write and
/// starts a new timer, so only the last snapshot of a burst is written.
#[derive(Debug)]
pub struct StoreDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl StoreDebouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period before a write.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a write of `snapshot`, replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<S>(&mut self, store: Arc<S>, backend_id: String, snapshot: Workspace)
    where
        S: WorkspaceStore + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match store.write(&backend_id, &snapshot).await {
                Ok(()) => tracing::debug!(
                    backend_id = %backend_id,
                    requests = snapshot.requests.len(),
                    "Workspace stored"
                ),
                Err(error) => tracing::warn!(
                    backend_id = %backend_id,
                    error = %error,
                    "Unable to store workspace"
                ),
            }
        }));
    }

    /// Aborts the pending write. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Returns true while a write is scheduled but not yet done.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}
