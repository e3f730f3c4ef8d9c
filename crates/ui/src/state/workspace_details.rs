//! Workspace details view and editor form.

use meridian_domain::{Workspace, WorkspaceMetaUpdate};

/// Placeholder shown for empty values.
pub const NO_DATA: &str = "No data";

/// Editor form for workspace metadata.
///
/// Every field is submitted; a cleared input clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceEditorForm {
    /// `provider.email`
    pub provider_email: String,
    /// `provider.name`
    pub provider_name: String,
    /// `provider.url`
    pub provider_url: String,
    /// `meta.published`
    pub published: String,
    /// `meta.version`
    pub version: String,
    /// Markdown description.
    pub description: String,
}

impl WorkspaceEditorForm {
    /// Prefills the form from a workspace.
    #[must_use]
    pub fn from_workspace(workspace: &Workspace) -> Self {
        let meta = workspace.meta.as_ref();
        let provider = workspace.provider.as_ref();
        let text = |value: Option<&Option<String>>| {
            value.and_then(Option::as_deref).unwrap_or_default().to_string()
        };
        Self {
            provider_email: text(provider.map(|p| &p.email)),
            provider_name: text(provider.map(|p| &p.name)),
            provider_url: text(provider.map(|p| &p.url)),
            published: text(meta.map(|m| &m.published)),
            version: text(meta.map(|m| &m.version)),
            description: text(meta.map(|m| &m.description)),
        }
    }

    /// Converts the submitted form into a metadata update.
    #[must_use]
    pub fn into_update(self) -> WorkspaceMetaUpdate {
        let field = |value: String| Some(value.trim().to_string());
        WorkspaceMetaUpdate {
            provider_email: field(self.provider_email),
            provider_name: field(self.provider_name),
            provider_url: field(self.provider_url),
            published: field(self.published),
            version: field(self.version),
            description: field(self.description),
        }
    }
}

/// A labelled value in the details view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsRow {
    /// Row label.
    pub label: &'static str,
    /// Value, `None` when empty.
    pub value: Option<String>,
}

impl DetailsRow {
    fn new(label: &'static str, value: Option<&String>) -> Self {
        Self {
            label,
            value: value.filter(|v| !v.trim().is_empty()).cloned(),
        }
    }

    /// Text to render.
    #[must_use]
    pub fn display(&self) -> &str {
        self.value.as_deref().unwrap_or(NO_DATA)
    }
}

/// Read-only workspace details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceDetails {
    /// Description, rendered only when present.
    pub description: Option<String>,
    /// Version and publication rows.
    pub rows: Vec<DetailsRow>,
    /// Provider section rows.
    pub provider: Vec<DetailsRow>,
}

impl WorkspaceDetails {
    /// Builds the details of a workspace.
    #[must_use]
    pub fn from_workspace(workspace: &Workspace) -> Self {
        let meta = workspace.meta.as_ref();
        let provider = workspace.provider.as_ref();
        Self {
            description: meta
                .and_then(|m| m.description.clone())
                .filter(|d| !d.trim().is_empty()),
            rows: vec![
                DetailsRow::new("Version", meta.and_then(|m| m.version.as_ref())),
                DetailsRow::new("Published", meta.and_then(|m| m.published.as_ref())),
            ],
            provider: vec![
                DetailsRow::new("Author", provider.and_then(|p| p.name.as_ref())),
                DetailsRow::new("Address", provider.and_then(|p| p.url.as_ref())),
                DetailsRow::new("Contact", provider.and_then(|p| p.email.as_ref())),
            ],
        }
    }
}
