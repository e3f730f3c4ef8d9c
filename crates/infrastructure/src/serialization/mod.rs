//! Deterministic JSON serialization for stored workspaces and settings.
//!
//! Output uses 2-space indentation and a trailing newline so snapshots
//! diff cleanly.

mod json;

pub use json::*;
