//! UI Bridge Module
//!
//! Defines the commands a renderer sends to the workspace and the updates
//! it receives back, plus [`WorkspaceView`] which applies them.

use std::collections::HashSet;

use meridian_application::ports::WorkspaceStore;
use meridian_application::{AddOptions, TransportEvent, WorkspaceController};
use meridian_domain::{RequestData, Workspace};

use crate::state::{
    EditorEvent, HitNode, KeyPress, PanelIntent, RequestPanel, TabStrip, WorkspaceDetails,
    WorkspaceEditorForm,
};

/// Commands sent from the renderer.
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// Tab widths were measured.
    Layout {
        /// Width of every tab in order.
        widths: Vec<f32>,
    },
    /// User clicked a tab.
    SelectTab {
        /// Tab position.
        index: usize,
    },
    /// User clicked the close icon of a tab.
    CloseTab {
        /// Tab position.
        index: usize,
    },
    /// User clicked the "new tab" button.
    NewTab,
    /// User asked to duplicate a tab.
    DuplicateTab {
        /// Tab position.
        index: usize,
    },
    /// User closed the active tab from the keyboard.
    CloseActiveTab,
    /// Pointer pressed on the strip and started dragging.
    DragStart {
        /// Hit path, innermost node first.
        path: Vec<HitNode>,
        /// Pointer x.
        x: f32,
    },
    /// Pointer moved over the strip during a drag.
    DragOver {
        /// Hit path, innermost node first.
        path: Vec<HitNode>,
        /// Pointer x.
        x: f32,
    },
    /// Pointer left the strip during a drag.
    DragLeave,
    /// A dragged tab was released.
    DropTab,
    /// A request dragged from outside was released on the strip.
    DropRequest {
        /// The dropped request.
        request: Box<RequestData>,
        /// Pointer x.
        x: f32,
    },
    /// Drag cancelled.
    DragEnd,
    /// The request editor reported a change.
    Editor(EditorEvent),
    /// Key pressed inside the request panel.
    KeyDown(KeyPress),
    /// User cleared the response.
    ClearResponse,
    /// A stored request was deleted elsewhere.
    RequestDeleted {
        /// Data-store id.
        id: String,
    },
    /// User saved the workspace editor form.
    SaveDetails(WorkspaceEditorForm),
}

/// Tab as rendered in the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabData {
    /// Tab id.
    pub id: String,
    /// Label.
    pub label: String,
    /// HTTP method of the linked request.
    pub method: String,
    /// Whether this tab is selected.
    pub selected: bool,
}

/// Updates sent to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// The tab strip changed.
    Tabs(Vec<TabData>),
    /// The request panel changed.
    Panel,
    /// Drag feedback changed.
    Drag,
    /// The workspace details changed.
    Details(WorkspaceDetails),
}

/// Connects a [`WorkspaceController`] to the view models.
pub struct WorkspaceView<S> {
    controller: WorkspaceController<S>,
    strip: TabStrip,
    panel: Option<RequestPanel>,
    loading: HashSet<String>,
}

impl<S> WorkspaceView<S>
where
    S: WorkspaceStore + 'static,
{
    /// Wraps a controller.
    #[must_use]
    pub fn new(controller: WorkspaceController<S>) -> Self {
        let mut view = Self {
            controller,
            strip: TabStrip::new(),
            panel: None,
            loading: HashSet::new(),
        };
        view.sync_panel();
        view
    }

    /// The wrapped controller.
    #[must_use]
    pub const fn controller(&self) -> &WorkspaceController<S> {
        &self.controller
    }

    /// Mutable access to the wrapped controller.
    pub fn controller_mut(&mut self) -> &mut WorkspaceController<S> {
        &mut self.controller
    }

    /// The tab strip.
    #[must_use]
    pub const fn strip(&self) -> &TabStrip {
        &self.strip
    }

    /// Panel of the selected tab.
    #[must_use]
    pub const fn panel(&self) -> Option<&RequestPanel> {
        self.panel.as_ref()
    }

    /// Tabs as rendered.
    #[must_use]
    pub fn tab_data(&self) -> Vec<TabData> {
        let selected = self.controller.selected();
        self.controller
            .tabs()
            .iter()
            .enumerate()
            .map(|(index, tab)| TabData {
                id: tab.id.to_string(),
                label: tab.label.clone(),
                method: self
                    .controller
                    .tab_set()
                    .request_for_tab(&tab.id)
                    .map(|r| r.request.method.to_string())
                    .unwrap_or_default(),
                selected: selected == Some(index),
            })
            .collect()
    }

    /// Current workspace details.
    #[must_use]
    pub fn details(&self) -> WorkspaceDetails {
        WorkspaceDetails::from_workspace(&self.controller.workspace())
    }

    /// Prefilled editor form.
    #[must_use]
    pub fn editor_form(&self) -> WorkspaceEditorForm {
        WorkspaceEditorForm::from_workspace(&self.controller.workspace())
    }

    /// Applies a renderer command.
    pub fn handle(&mut self, command: UiCommand) -> Option<UiUpdate> {
        match command {
            UiCommand::Layout { widths } => {
                self.strip.layout(&widths);
                Some(UiUpdate::Drag)
            }
            UiCommand::SelectTab { index } => {
                self.controller.select(index).then(|| self.tabs_changed())
            }
            UiCommand::CloseTab { index } => {
                if index >= self.controller.len() {
                    return None;
                }
                self.forget_loading(index);
                self.controller.remove_request(index, false);
                Some(self.tabs_changed())
            }
            UiCommand::NewTab => {
                self.controller.add_empty();
                Some(self.tabs_changed())
            }
            UiCommand::DuplicateTab { index } => self
                .controller
                .duplicate_tab(index)
                .map(|_| self.tabs_changed()),
            UiCommand::CloseActiveTab => {
                let index = self.controller.selected()?;
                self.forget_loading(index);
                self.controller.close_active_tab();
                Some(self.tabs_changed())
            }
            UiCommand::DragStart { path, x } => {
                self.strip.drag_start(&path, x).map(|_| UiUpdate::Drag)
            }
            UiCommand::DragOver { path, x } => {
                self.strip.drag_over(&path, x);
                Some(UiUpdate::Drag)
            }
            UiCommand::DragLeave => {
                self.strip.drag_leave();
                Some(UiUpdate::Drag)
            }
            UiCommand::DropTab => {
                let (from, to) = self.strip.drop_reorder()?;
                self.controller
                    .move_tab(from, to)
                    .then(|| self.tabs_changed())
            }
            UiCommand::DropRequest { request, x } => {
                let index = self.strip.drop_external(x);
                self.controller.add_at(index, *request, AddOptions::default());
                Some(self.tabs_changed())
            }
            UiCommand::DragEnd => {
                self.strip.drag_end();
                Some(UiUpdate::Drag)
            }
            UiCommand::Editor(event) => self.editor_changed(event),
            UiCommand::KeyDown(press) => self.key_down(press),
            UiCommand::ClearResponse => {
                let panel = self.panel.as_mut()?;
                panel.clear_response();
                self.controller.clear_current();
                Some(UiUpdate::Panel)
            }
            UiCommand::RequestDeleted { id } => {
                if self.controller.request_deleted(&id) == 0 {
                    return None;
                }
                if let Some(panel) = self.panel.as_mut() {
                    panel.request_deleted(&id);
                }
                Some(UiUpdate::Panel)
            }
            UiCommand::SaveDetails(form) => {
                self.controller.update_meta(form.into_update());
                Some(UiUpdate::Details(self.details()))
            }
        }
    }

    /// Applies a transport event. Returns an update when the panel changed.
    pub fn handle_transport(&mut self, event: &TransportEvent) -> Option<UiUpdate> {
        match event {
            TransportEvent::Requested { id } => {
                self.loading.insert(id.clone());
            }
            TransportEvent::Response { id, .. } => {
                self.loading.remove(id);
                self.controller.apply_transport_event(event);
            }
            TransportEvent::Ready { .. } => {}
        }
        let panel = self.panel.as_mut()?;
        if panel.id() != event.id() {
            return None;
        }
        panel.apply_transport(event);
        Some(UiUpdate::Panel)
    }

    /// Resyncs after the controller was mutated directly, e.g. on restore.
    pub fn refresh(&mut self) -> UiUpdate {
        self.tabs_changed()
    }

    /// Snapshot for persistence or export.
    #[must_use]
    pub fn workspace(&self) -> Workspace {
        self.controller.workspace()
    }

    fn editor_changed(&mut self, event: EditorEvent) -> Option<UiUpdate> {
        let panel = self.panel.as_mut()?;
        if matches!(event, EditorEvent::Clear(_)) {
            self.loading.remove(panel.id());
        }
        let request = panel.apply_editor(event).clone();
        let tab = panel.request().tab.clone();
        self.controller.update_request(&tab, request);
        Some(self.tabs_changed())
    }

    fn key_down(&mut self, press: KeyPress) -> Option<UiUpdate> {
        match self.panel.as_ref()?.key_down(press)? {
            PanelIntent::Send => {
                if !self.controller.send_current() {
                    tracing::debug!("No transport to send the request");
                }
                None
            }
            PanelIntent::Abort => {
                self.controller.abort_current();
                let panel = self.panel.as_mut()?;
                self.loading.remove(panel.id());
                panel.abort();
                Some(UiUpdate::Panel)
            }
        }
    }

    fn forget_loading(&mut self, index: usize) {
        if let Some(entry) = self.controller.tab_set().request_at_tab(index) {
            self.loading.remove(&entry.id);
        }
    }

    fn tabs_changed(&mut self) -> UiUpdate {
        self.sync_panel();
        UiUpdate::Tabs(self.tab_data())
    }

    /// Rebuilds the panel when the selected request changed.
    fn sync_panel(&mut self) {
        let Some(selected) = self.controller.selected_request() else {
            self.panel = None;
            return;
        };
        if let Some(panel) = &self.panel
            && panel.id() == selected.id
            && panel.request().tab == selected.tab
        {
            return;
        }
        let mut panel = RequestPanel::new(selected.clone());
        if self.loading.contains(&selected.id) {
            panel.apply_transport(&TransportEvent::Requested {
                id: selected.id.clone(),
            });
        }
        self.panel = Some(panel);
    }
}
