//! Built-in request processors.

use meridian_domain::RequestData;

use crate::ports::{RequestProcessor, TransportError};

/// Sends the draft as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughProcessor;

impl RequestProcessor for PassthroughProcessor {
    async fn process(&self, request: RequestData) -> Result<RequestData, TransportError> {
        Ok(request)
    }
}
