//! Application error types

use meridian_domain::DomainError;
use thiserror::Error;

use crate::ports::{RequestSourceError, TransportError, WorkspaceStoreError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The workspace store failed.
    #[error("store error: {0}")]
    Store(#[from] WorkspaceStoreError),

    /// The transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request data store failed.
    #[error("request source error: {0}")]
    Source(#[from] RequestSourceError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
