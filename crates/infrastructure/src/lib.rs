//! Meridian Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod persistence;
pub mod processing;
pub mod serialization;

pub use persistence::{
    FileWorkspaceStore, MemoryWorkspaceStore, SettingsError, SettingsRepository,
    apply_env_overrides,
};
pub use processing::{VariableProcessor, VariableReference, parse_variables};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
