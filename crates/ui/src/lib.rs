//! Meridian UI - Headless view models
//!
//! This crate holds the state behind the workspace screens: the tab strip
//! with drag reordering, the request panel and the workspace details. A
//! renderer drives it through [`UiCommand`] and redraws on [`UiUpdate`].

pub mod bridge;
pub mod state;

pub use bridge::{TabData, UiCommand, UiUpdate, WorkspaceView};
pub use state::{
    DetailsRow, EditorEvent, HitNode, Key, KeyPress, PanelIntent, RequestPanel, Shift,
    TabGeometry, TabStrip, WorkspaceDetails, WorkspaceEditorForm,
};
