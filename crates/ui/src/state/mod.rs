//! View state for the workspace screens.

mod request_panel;
mod tab_strip;
mod workspace_details;

pub use request_panel::{EditorEvent, Key, KeyPress, PanelIntent, RequestPanel};
pub use tab_strip::{HitNode, Shift, TabGeometry, TabStrip};
pub use workspace_details::{DetailsRow, NO_DATA, WorkspaceDetails, WorkspaceEditorForm};
