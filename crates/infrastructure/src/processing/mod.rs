//! Request processors applied before transport.

mod variables;

pub use variables::{VariableProcessor, VariableReference, parse_variables};
