//! Workspace store port.

use std::future::Future;

use meridian_domain::Workspace;

/// Error type for workspace store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WorkspaceStoreError {
    /// The stored snapshot could not be parsed or has an unknown kind.
    #[error("Malformed workspace snapshot: {0}")]
    Malformed(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File system or backend error.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Persistence collaborator for workspace snapshots.
///
/// Keyed by an arbitrary backend id so multiple named workspaces can be
/// stored side by side.
pub trait WorkspaceStore: Send + Sync {
    /// Reads the snapshot stored under `id`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn read(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Workspace>, WorkspaceStoreError>> + Send;

    /// Writes the snapshot under `id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn write(
        &self,
        id: &str,
        workspace: &Workspace,
    ) -> impl Future<Output = Result<(), WorkspaceStoreError>> + Send;
}
