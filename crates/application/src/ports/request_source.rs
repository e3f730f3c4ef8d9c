//! Request data-store port.

use std::future::Future;

use meridian_domain::{RequestData, RequestKind};

/// Error type for data-store reads.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestSourceError {
    /// The data store is not available.
    #[error("Request store unavailable: {0}")]
    Unavailable(String),

    /// A record could not be decoded.
    #[error("Invalid request record: {0}")]
    Invalid(String),
}

/// Read access to saved requests, history and projects.
///
/// Used to open stored requests in the workspace. Missing records are not
/// errors: single reads return `None` and bulk reads skip them.
pub trait RequestSource: Send + Sync {
    /// Reads one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn read_request(
        &self,
        kind: RequestKind,
        id: &str,
    ) -> impl Future<Output = Result<Option<RequestData>, RequestSourceError>> + Send;

    /// Reads several requests, in the order of `ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn read_requests(
        &self,
        kind: RequestKind,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<RequestData>, RequestSourceError>> + Send;

    /// Reads the requests of a project, in project order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn read_project_requests(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<RequestData>, RequestSourceError>> + Send;
}
