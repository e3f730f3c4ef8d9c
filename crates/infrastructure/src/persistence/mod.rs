//! Persistence adapters for workspace snapshots and settings.

mod file_workspace_store;
mod memory_workspace_store;
mod settings_repository;

pub use file_workspace_store::FileWorkspaceStore;
pub use memory_workspace_store::MemoryWorkspaceStore;
pub use settings_repository::{
    BACKEND_ID_VAR, DATA_DIR_VAR, STORE_TIMEOUT_VAR, SettingsError, SettingsRepository,
    apply_env_overrides,
};
