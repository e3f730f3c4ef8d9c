//! In-memory workspace store.

use std::collections::HashMap;

use meridian_application::ports::{WorkspaceStore, WorkspaceStoreError};
use meridian_domain::Workspace;
use parking_lot::RwLock;

/// Keeps snapshots in memory. Used for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryWorkspaceStore {
    snapshots: RwLock<HashMap<String, Workspace>>,
}

impl MemoryWorkspaceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `workspace` under `id`.
    #[must_use]
    pub fn with_snapshot(id: impl Into<String>, workspace: Workspace) -> Self {
        let store = Self::new();
        store.snapshots.write().insert(id.into(), workspace);
        store
    }

    /// Returns a copy of the snapshot stored under `id`.
    #[must_use]
    pub fn snapshot(&self, id: &str) -> Option<Workspace> {
        self.snapshots.read().get(id).cloned()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

impl WorkspaceStore for MemoryWorkspaceStore {
    async fn read(&self, id: &str) -> Result<Option<Workspace>, WorkspaceStoreError> {
        Ok(self.snapshot(id))
    }

    async fn write(&self, id: &str, workspace: &Workspace) -> Result<(), WorkspaceStoreError> {
        self.snapshots
            .write()
            .insert(id.to_string(), workspace.clone());
        Ok(())
    }
}
