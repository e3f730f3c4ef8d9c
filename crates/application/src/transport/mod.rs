//! Send/abort/response mediation between panels and the request runner.

mod events;
mod mediator;
mod processor;

pub use events::{TransportEvent, TransportEvents};
pub use mediator::{TransportDispatch, TransportMediator};
pub use processor::PassthroughProcessor;
