//! Tabs and the requests linked to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::request::RequestData;

/// Identifier of a workspace tab.
///
/// Generated when the tab is created. It links a tab to its
/// [`WorkspaceRequest`] and means nothing outside the running workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    /// Generates a fresh tab id.
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_id())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A slot in the tab strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Tab id.
    pub id: TabId,
    /// Text rendered on the tab.
    pub label: String,
}

impl Tab {
    /// Creates a tab labelled after the request.
    #[must_use]
    pub fn for_request(request: &RequestData) -> Self {
        Self {
            id: TabId::generate(),
            label: request.label().to_string(),
        }
    }
}

/// An editable request plus the tab it is rendered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRequest {
    /// Editor request id. Transport events are routed by this id.
    pub id: String,
    /// The request being edited.
    pub request: RequestData,
    /// Owning tab.
    pub tab: TabId,
}

impl WorkspaceRequest {
    /// Wraps a request for the given tab with a fresh editor id.
    #[must_use]
    pub fn new(request: RequestData, tab: TabId) -> Self {
        Self {
            id: generate_id(),
            request,
            tab,
        }
    }
}
