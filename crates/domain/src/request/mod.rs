//! HTTP Request domain types

mod data;
mod method;

pub use data::{DEFAULT_LABEL, DEFAULT_URL, RequestData, RequestKind};
pub use method::HttpMethod;
