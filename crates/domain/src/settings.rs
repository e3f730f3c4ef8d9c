//! Workspace Settings Domain Model
//!
//! Runtime options for the workspace controller and its persistence.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Backend id used when none is configured.
pub const DEFAULT_BACKEND_ID: &str = "default";

/// Settings for a workspace session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Identifier passed to the workspace store on read and write.
    #[serde(default = "default_backend_id")]
    pub backend_id: String,

    /// Delay after the last mutation before the workspace is written.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Whether the workspace is restored when the session starts.
    #[serde(default = "default_auto_restore")]
    pub auto_restore: bool,

    /// Directory holding workspace snapshots. Platform data dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_backend_id() -> String {
    DEFAULT_BACKEND_ID.to_string()
}

const fn default_store_timeout_ms() -> u64 {
    500
}

const fn default_auto_restore() -> bool {
    true
}

impl WorkspaceSettings {
    /// Returns the store debounce delay.
    #[must_use]
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            backend_id: default_backend_id(),
            store_timeout_ms: default_store_timeout_ms(),
            auto_restore: default_auto_restore(),
            data_dir: None,
        }
    }
}
