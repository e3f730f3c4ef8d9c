//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request kind is not one of the known data-store kinds.
    #[error("unknown request kind: {0}")]
    UnknownRequestKind(String),

    /// A workspace snapshot carries an unknown `kind` tag.
    #[error("unknown workspace kind: {0}")]
    UnknownWorkspaceKind(String),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
