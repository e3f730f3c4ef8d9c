//! Requests coming from a data import.

use crate::request::{RequestData, RequestKind};

/// Normalized import content that can be opened in the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBundle {
    /// Saved requests, including those belonging to imported projects.
    pub saved: Vec<RequestData>,
    /// History entries.
    pub history: Vec<RequestData>,
}

impl ImportBundle {
    /// Returns true when there is nothing to open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty() && self.history.is_empty()
    }

    /// Flattens the bundle, saved requests first, tagging each with its kind.
    #[must_use]
    pub fn into_requests(self) -> Vec<RequestData> {
        let saved = self.saved.into_iter().map(|mut r| {
            r.kind = Some(RequestKind::Saved);
            r
        });
        let history = self.history.into_iter().map(|mut r| {
            r.kind = Some(RequestKind::History);
            r
        });
        saved.chain(history).collect()
    }
}
