//! File system workspace store.
//!
//! Each workspace is one `<id>.json` file in the store directory:
//! - Linux: ~/.local/share/meridian/workspaces/
//! - macOS: ~/Library/Application Support/meridian/workspaces/
//! - Windows: %APPDATA%/meridian/workspaces/

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use meridian_application::ports::{WorkspaceStore, WorkspaceStoreError};
use meridian_domain::Workspace;
use tokio::fs;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const WORKSPACES_DIR: &str = "workspaces";
const EXTENSION: &str = "json";

/// Stores workspace snapshots as stable JSON files.
#[derive(Debug, Clone)]
pub struct FileWorkspaceStore {
    root: PathBuf,
}

impl FileWorkspaceStore {
    /// Creates a store writing into `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store under `data_dir`, or the platform data directory
    /// when `data_dir` is `None`.
    #[must_use]
    pub fn in_data_dir(data_dir: Option<&Path>) -> Option<Self> {
        let base = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()?.join("meridian"),
        };
        Some(Self::new(base.join(WORKSPACES_DIR)))
    }

    /// Directory holding the snapshots.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` cannot be used as a file name.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, WorkspaceStoreError> {
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\', '\0']);
        if !valid {
            return Err(WorkspaceStoreError::Storage(format!(
                "invalid workspace id: {id:?}"
            )));
        }
        Ok(self.root.join(format!("{id}.{EXTENSION}")))
    }
}

impl WorkspaceStore for FileWorkspaceStore {
    async fn read(&self, id: &str) -> Result<Option<Workspace>, WorkspaceStoreError> {
        let path = self.path_for(id)?;
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WorkspaceStoreError::Storage(e.to_string())),
        };

        let workspace = from_json_bytes(&content)
            .map_err(|e| WorkspaceStoreError::Malformed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "Workspace read");
        Ok(Some(workspace))
    }

    async fn write(&self, id: &str, workspace: &Workspace) -> Result<(), WorkspaceStoreError> {
        let path = self.path_for(id)?;
        let content = to_json_stable_bytes(workspace)
            .map_err(|e| WorkspaceStoreError::Serialization(e.to_string()))?;

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| WorkspaceStoreError::Storage(e.to_string()))?;

        // Write to a sibling file first so a crash never leaves a truncated snapshot.
        let staging = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&staging, content)
            .await
            .map_err(|e| WorkspaceStoreError::Storage(e.to_string()))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| WorkspaceStoreError::Storage(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Workspace written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_domain::{HttpMethod, RequestData};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileWorkspaceStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = FileWorkspaceStore::new(dir.path().join("workspaces"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_snapshot_reads_as_none() {
        let (_dir, store) = store();
        assert!(store.read("default").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (_dir, store) = store();
        let mut workspace = Workspace::with_id("ws-1");
        workspace.selected = Some(1);
        workspace.requests = vec![
            RequestData::new(HttpMethod::Get, "https://a.dev"),
            RequestData::new(HttpMethod::Delete, "https://b.dev"),
        ];

        store.write("default", &workspace).await.unwrap();
        let restored = store.read("default").await.unwrap().unwrap();

        assert_eq!(restored, workspace);
        assert!(!store.root().join("default.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_snapshots_are_keyed_by_id() {
        let (_dir, store) = store();
        store.write("one", &Workspace::with_id("1")).await.unwrap();
        store.write("two", &Workspace::with_id("2")).await.unwrap();

        assert_eq!(store.read("one").await.unwrap().unwrap().id, "1");
        assert_eq!(store.read("two").await.unwrap().unwrap().id, "2");
    }

    #[tokio::test]
    async fn test_unknown_kind_is_malformed() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.root()).unwrap();
        std::fs::write(
            store.root().join("default.json"),
            r#"{"kind": "LegacyThing", "requests": []}"#,
        )
        .unwrap();

        let result = store.read("default").await;
        assert!(matches!(result, Err(WorkspaceStoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.root()).unwrap();
        std::fs::write(store.root().join("default.json"), "not json").unwrap();

        assert!(matches!(
            store.read("default").await,
            Err(WorkspaceStoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = FileWorkspaceStore::new("/tmp/meridian");
        assert!(store.path_for("../etc").is_err());
        assert!(store.path_for("").is_err());
        assert!(store.path_for("..").is_err());
        assert_eq!(
            store.path_for("default").unwrap(),
            PathBuf::from("/tmp/meridian/default.json")
        );
    }
}
