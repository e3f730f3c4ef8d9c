//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the workspace core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod request_source;
mod transport;
mod workspace_store;

pub use request_source::{RequestSource, RequestSourceError};
pub use transport::{
    CancellationReceiver, CancellationToken, RequestProcessor, RequestRunner, TransportError,
};
pub use workspace_store::{WorkspaceStore, WorkspaceStoreError};
