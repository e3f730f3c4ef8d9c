//! Meridian Application - Workspace controller and ports
//!
//! This crate holds the tabbed workspace controller, the ports it talks
//! through and the transport mediator that routes responses back to the
//! request they belong to. Adapters live in the infrastructure layer.

pub mod error;
pub mod ports;
pub mod transport;
pub mod workspace;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    CancellationReceiver, CancellationToken, RequestProcessor, RequestRunner, RequestSource,
    RequestSourceError, TransportError, WorkspaceStore, WorkspaceStoreError,
};
pub use transport::{
    PassthroughProcessor, TransportDispatch, TransportEvent, TransportEvents, TransportMediator,
};
pub use workspace::{AddOptions, StoreDebouncer, TabSet, WorkspaceController};
