//! Workspace domain types: tabs, linked requests and the persisted snapshot.

mod import;
mod snapshot;
mod tab;

pub use import::ImportBundle;
pub use snapshot::{Workspace, WorkspaceKind, WorkspaceMeta, WorkspaceMetaUpdate, WorkspaceProvider};
pub use tab::{Tab, TabId, WorkspaceRequest};
