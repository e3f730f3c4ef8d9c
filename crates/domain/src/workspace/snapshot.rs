//! The persisted workspace snapshot.

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::request::RequestData;

/// Discriminator of the snapshot format.
///
/// Snapshots with any other tag fail to deserialize and are treated as
/// missing data by readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkspaceKind {
    /// Current format.
    #[default]
    #[serde(rename = "DomainWorkspace", alias = "ARC#DomainWorkspace")]
    DomainWorkspace,
}

/// Descriptive metadata shown in the workspace details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMeta {
    /// Workspace version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Publication date as entered by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    /// Markdown description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Publisher contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceProvider {
    /// Publisher name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Publisher URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Publisher email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Values submitted by the workspace editor form.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceMetaUpdate {
    /// `provider.email`
    pub provider_email: Option<String>,
    /// `provider.name`
    pub provider_name: Option<String>,
    /// `provider.url`
    pub provider_url: Option<String>,
    /// `meta.published`
    pub published: Option<String>,
    /// `meta.version`
    pub version: Option<String>,
    /// `meta.description`
    pub description: Option<String>,
}

/// Externally persisted state of a workspace.
///
/// `requests` is ordered like the tab strip. Tab ids are not persisted;
/// they are regenerated on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Format tag.
    pub kind: WorkspaceKind,
    /// Workspace id.
    #[serde(default = "generate_id")]
    pub id: String,
    /// Index of the selected tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<usize>,
    /// Open requests in tab order.
    #[serde(default)]
    pub requests: Vec<RequestData>,
    /// Descriptive metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<WorkspaceMeta>,
    /// Publisher contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<WorkspaceProvider>,
}

impl Workspace {
    /// Creates an empty workspace with a freshly generated id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(generate_id())
    }

    /// Creates an empty workspace with the given id.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            kind: WorkspaceKind::DomainWorkspace,
            id: id.into(),
            selected: None,
            requests: Vec::new(),
            meta: None,
            provider: None,
        }
    }

    /// Merges editor form values, creating `meta`/`provider` when absent.
    pub fn apply_meta_update(&mut self, update: WorkspaceMetaUpdate) {
        let meta = self.meta.get_or_insert_with(WorkspaceMeta::default);
        if update.published.is_some() {
            meta.published = update.published;
        }
        if update.version.is_some() {
            meta.version = update.version;
        }
        if update.description.is_some() {
            meta.description = update.description;
        }

        let provider = self.provider.get_or_insert_with(WorkspaceProvider::default);
        if update.provider_email.is_some() {
            provider.email = update.provider_email;
        }
        if update.provider_name.is_some() {
            provider.name = update.provider_name;
        }
        if update.provider_url.is_some() {
            provider.url = update.provider_url;
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
