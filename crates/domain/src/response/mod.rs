//! Transport request and response types

mod transport;

pub use transport::{TransportRequest, TransportResponse};
