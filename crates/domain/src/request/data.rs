//! Editable request payload held by a workspace tab.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};
use crate::response::{TransportRequest, TransportResponse};

/// URL the editor puts into a fresh request.
pub const DEFAULT_URL: &str = "http://";

/// Label used for tabs whose request has neither a name nor a URL.
pub const DEFAULT_LABEL: &str = "New request";

/// Data-store collection a request was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// A request the user saved explicitly.
    Saved,
    /// A request recorded in the history.
    History,
}

impl RequestKind {
    /// Returns the kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::History => "history",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "saved" => Ok(Self::Saved),
            "history" => Ok(Self::History),
            other => Err(DomainError::UnknownRequestKind(other.to_string())),
        }
    }
}

/// A request as edited in a workspace panel.
///
/// `headers` and `payload` are kept as the raw text the editor produced.
/// `id`/`rev` are present only when the request came from the data store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    /// Data-store id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Data-store revision.
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Data-store collection.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RequestKind>,
    /// User given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Target URL.
    #[serde(default)]
    pub url: String,
    /// Raw HTTP headers text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    /// Raw message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ids of projects this request belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    /// The request as it was sent by the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_request: Option<TransportRequest>,
    /// The last response received for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<TransportResponse>,
}

impl RequestData {
    /// Creates a request with the given method and URL.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates the request put into a blank editor: `GET http://`.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(HttpMethod::Get, DEFAULT_URL)
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the raw headers.
    #[must_use]
    pub fn with_headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Marks the request as read from the data store.
    #[must_use]
    pub fn stored(mut self, kind: RequestKind, id: impl Into<String>) -> Self {
        self.kind = Some(kind);
        self.id = Some(id.into());
        self
    }

    /// Returns true when the request carries nothing the user typed in.
    ///
    /// The URL is either empty or the editor default and neither headers
    /// nor payload are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (self.url.is_empty() || self.url == DEFAULT_URL)
            && is_blank(self.headers.as_deref())
            && is_blank(self.payload.as_deref())
    }

    /// Returns the tab label: the name, else the URL, else a placeholder.
    #[must_use]
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if !self.url.is_empty() => &self.url,
            _ => DEFAULT_LABEL,
        }
    }

    /// Returns true when the request was read from the data store.
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        self.id.is_some()
    }

    /// Copies the fields the request editor owns from `edited`.
    ///
    /// Data-store identity, projects and the last response are kept.
    pub fn apply_editor(&mut self, edited: Self) {
        self.name = edited.name;
        self.method = edited.method;
        self.url = edited.url;
        self.headers = edited.headers;
        self.payload = edited.payload;
        self.description = edited.description;
    }

    /// Drops the data-store identity so the request is treated as unsaved.
    pub fn detach_from_store(&mut self) {
        self.id = None;
        self.rev = None;
    }

    /// Removes the last transport request and response.
    pub fn clear_response(&mut self) {
        self.transport_request = None;
        self.response = None;
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}
