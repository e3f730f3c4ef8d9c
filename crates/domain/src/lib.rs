//! Meridian Domain - Core workspace types
//!
//! This crate defines the data model of a request workspace: editable
//! requests, tabs, the persisted snapshot and settings.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod request;
pub mod response;
pub mod settings;
pub mod state;
pub mod workspace;

pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use request::{HttpMethod, RequestData, RequestKind};
pub use response::{TransportRequest, TransportResponse};
pub use settings::WorkspaceSettings;
pub use state::RequestState;
pub use workspace::{
    ImportBundle, Tab, TabId, Workspace, WorkspaceKind, WorkspaceMeta, WorkspaceMetaUpdate,
    WorkspaceProvider, WorkspaceRequest,
};
