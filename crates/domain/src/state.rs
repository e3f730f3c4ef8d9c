//! Request execution state for panel binding.
//!
//! A panel moves `Idle -> Loading -> Success | Error` for each send and
//! back to `Idle` when its response is cleared.

use serde::{Deserialize, Serialize};

use crate::response::TransportResponse;

/// Represents the current state of a request in a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequestState {
    /// No request has been sent yet, or the response was cleared.
    #[default]
    Idle,

    /// Request is in progress.
    Loading {
        /// When the request started (for elapsed time display).
        /// Skipped in serialization as Instant is not serializable.
        #[serde(skip)]
        started_at: Option<std::time::Instant>,
    },

    /// A response was received.
    Success {
        /// The response data.
        response: Box<TransportResponse>,
    },

    /// The transport reported an error, an abort or no result.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl RequestState {
    /// Creates a new Loading state with the current timestamp.
    #[must_use]
    pub fn loading() -> Self {
        Self::Loading {
            started_at: Some(std::time::Instant::now()),
        }
    }

    /// Derives the state from a routed response.
    #[must_use]
    pub fn from_response(response: TransportResponse) -> Self {
        if response.error {
            Self::Error {
                message: response
                    .message
                    .unwrap_or_else(|| "Request failed".to_string()),
            }
        } else {
            Self::Success {
                response: Box::new(response),
            }
        }
    }

    /// Returns true if a request is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Returns true if the last request failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns the response if in Success state.
    #[must_use]
    pub fn response(&self) -> Option<&TransportResponse> {
        match self {
            Self::Success { response } => Some(response),
            _ => None,
        }
    }

    /// Returns the elapsed time if loading.
    #[must_use]
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        match self {
            Self::Loading {
                started_at: Some(t),
            } => Some(t.elapsed()),
            _ => None,
        }
    }
}
