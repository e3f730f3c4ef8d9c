//! Workspace settings persistence.
//!
//! Settings live in the platform-specific config directory:
//! - Linux/macOS: ~/.config/meridian/settings.json
//! - Windows: %APPDATA%/meridian/settings.json

use std::path::PathBuf;

use meridian_domain::WorkspaceSettings;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Overrides [`WorkspaceSettings::backend_id`].
pub const BACKEND_ID_VAR: &str = "MERIDIAN_BACKEND_ID";
/// Overrides [`WorkspaceSettings::store_timeout_ms`].
pub const STORE_TIMEOUT_VAR: &str = "MERIDIAN_STORE_TIMEOUT_MS";
/// Overrides [`WorkspaceSettings::data_dir`].
pub const DATA_DIR_VAR: &str = "MERIDIAN_DATA_DIR";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// An environment override has an unusable value.
    #[error("Invalid value for {name}: {value}")]
    InvalidOverride {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Repository for [`WorkspaceSettings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    path: Option<PathBuf>,
}

impl SettingsRepository {
    /// Creates a repository using the platform config directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: dirs::config_dir().map(|p| p.join("meridian").join("settings.json")),
        }
    }

    /// Creates a repository reading and writing `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the settings file path, if available.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Loads settings from disk.
    ///
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<WorkspaceSettings, SettingsError> {
        let Some(path) = &self.path else {
            return Ok(WorkspaceSettings::default());
        };

        if !path.exists() {
            return Ok(WorkspaceSettings::default());
        }

        let content = fs::read(path).await?;
        let settings = from_json_bytes(&content)?;
        Ok(settings)
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory is known or the write fails.
    pub async fn save(&self, settings: &WorkspaceSettings) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Err(SettingsError::NoConfigDir);
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_stable_bytes(settings)?;
        fs::write(path, content).await?;

        Ok(())
    }
}

/// Applies `MERIDIAN_*` overrides read through `lookup`.
///
/// Empty values are ignored.
///
/// # Errors
///
/// Returns an error when the store timeout is not a number.
pub fn apply_env_overrides<F>(
    mut settings: WorkspaceSettings,
    lookup: F,
) -> Result<WorkspaceSettings, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(backend_id) = read(BACKEND_ID_VAR) {
        settings.backend_id = backend_id.trim().to_string();
    }
    if let Some(timeout) = read(STORE_TIMEOUT_VAR) {
        settings.store_timeout_ms =
            timeout
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidOverride {
                    name: STORE_TIMEOUT_VAR,
                    value: timeout.clone(),
                })?;
    }
    if let Some(dir) = read(DATA_DIR_VAR) {
        settings.data_dir = Some(PathBuf::from(dir));
    }
    Ok(settings)
}
