//! Transport request/response records attached to a workspace request.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;

/// The request as the transport actually sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRequest {
    /// Final URL after variable processing.
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Raw headers text sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    /// Payload sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// When the transport started.
    pub started_at: DateTime<Utc>,
    /// When the transport finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// A response routed back to the panel that sent the request.
///
/// Failures are represented as a response too: `error` is set, `status`
/// is zero and `message` explains what happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResponse {
    /// HTTP status code, zero for transport errors.
    pub status: u16,
    /// Status text (e.g., "OK", "Not Found")
    #[serde(default)]
    pub status_text: String,
    /// Raw response headers text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    /// Response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Round trip time.
    #[serde(default, with = "duration_millis")]
    pub loading_time: Duration,
    /// Marks a transport failure.
    #[serde(default)]
    pub error: bool,
    /// Error description when `error` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TransportResponse {
    /// Creates a successful response.
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>, loading_time: Duration) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: None,
            payload: None,
            loading_time,
            error: false,
            message: None,
        }
    }

    /// Creates an error response with status zero.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: None,
            payload: None,
            loading_time: Duration::ZERO,
            error: true,
            message: Some(message.into()),
        }
    }

    /// Sets the response body.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.error && self.status >= 200 && self.status < 300
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
