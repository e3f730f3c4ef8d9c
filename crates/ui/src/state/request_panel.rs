//! State of the request panel rendered for the selected tab.

use meridian_application::TransportEvent;
use meridian_domain::{RequestData, RequestState, WorkspaceRequest};

/// Change reported by the request editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Editor fields changed. Merged over the current request.
    Change(RequestData),
    /// Editor was reset. Replaces the request.
    Clear(RequestData),
}

/// Keys the panel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape.
    Escape,
    /// Enter or Return.
    Enter,
    /// Anything else.
    Other,
}

/// A key press delivered to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Ctrl (or Cmd) held.
    pub ctrl: bool,
    /// Focus is inside the body editor.
    pub in_body_editor: bool,
}

impl KeyPress {
    /// A plain key press outside the body editor.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            in_body_editor: false,
        }
    }

    /// Marks Ctrl as held.
    #[must_use]
    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Marks focus as inside the body editor.
    #[must_use]
    pub const fn in_body_editor(mut self) -> Self {
        self.in_body_editor = true;
        self
    }
}

/// What the panel asks the workspace to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelIntent {
    /// Send the request.
    Send,
    /// Abort the running request.
    Abort,
}

/// Request panel view model.
#[derive(Debug, Clone)]
pub struct RequestPanel {
    request: WorkspaceRequest,
    state: RequestState,
}

impl RequestPanel {
    /// Creates a panel for `request`, showing its last response if any.
    #[must_use]
    pub fn new(request: WorkspaceRequest) -> Self {
        let state = request
            .request
            .response
            .clone()
            .map_or(RequestState::Idle, RequestState::from_response);
        Self { request, state }
    }

    /// The request being edited.
    #[must_use]
    pub const fn request(&self) -> &WorkspaceRequest {
        &self.request
    }

    /// Editor id of the request.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.request.id
    }

    /// Current execution state.
    #[must_use]
    pub const fn state(&self) -> &RequestState {
        &self.state
    }

    /// Returns true while the request is running.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Applies an editor event. Returns the request to hand to the workspace.
    pub fn apply_editor(&mut self, event: EditorEvent) -> &RequestData {
        match event {
            EditorEvent::Change(edited) => self.request.request.apply_editor(edited),
            EditorEvent::Clear(request) => {
                self.request.request = request;
                self.state = RequestState::Idle;
            }
        }
        &self.request.request
    }

    /// Applies a transport event addressed to this panel.
    ///
    /// Returns true when the event changed the request so the workspace
    /// should be notified. Events for other ids are ignored.
    pub fn apply_transport(&mut self, event: &TransportEvent) -> bool {
        if event.id() != self.request.id {
            return false;
        }
        match event {
            TransportEvent::Requested { .. } => {
                self.state = RequestState::loading();
                false
            }
            TransportEvent::Ready { .. } => false,
            TransportEvent::Response {
                request, response, ..
            } => {
                self.request.request.transport_request.clone_from(request);
                self.request.request.response = Some(response.clone());
                self.state = RequestState::from_response(response.clone());
                true
            }
        }
    }

    /// Clears the response shown in the panel.
    pub fn clear_response(&mut self) {
        self.request.request.clear_response();
        self.state = RequestState::Idle;
    }

    /// A stored request was deleted. Returns true if it was this one.
    pub fn request_deleted(&mut self, data_store_id: &str) -> bool {
        if self.request.request.id.as_deref() != Some(data_store_id) {
            return false;
        }
        self.request.request.detach_from_store();
        true
    }

    /// Maps a key press to an intent.
    #[must_use]
    pub const fn key_down(&self, press: KeyPress) -> Option<PanelIntent> {
        match press.key {
            Key::Escape if self.loading() => Some(PanelIntent::Abort),
            Key::Enter if press.ctrl && !press.in_body_editor && !self.loading() => {
                Some(PanelIntent::Send)
            }
            _ => None,
        }
    }

    /// Abort intent accepted. Loading ends without waiting for the response.
    pub fn abort(&mut self) {
        if self.loading() {
            self.state = RequestState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_domain::{HttpMethod, TabId, TransportRequest, TransportResponse};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn panel() -> RequestPanel {
        let request = RequestData::new(HttpMethod::Get, "https://api.example.com/users")
            .with_name("Users");
        RequestPanel::new(WorkspaceRequest::new(request, TabId::generate()))
    }

    fn response_for(id: &str, status: u16) -> TransportEvent {
        TransportEvent::Response {
            id: id.to_string(),
            request: Some(TransportRequest {
                url: "https://api.example.com/users".into(),
                method: HttpMethod::Get,
                headers: None,
                payload: None,
                started_at: chrono::Utc::now(),
                ended_at: None,
            }),
            response: TransportResponse::new(status, "OK", Duration::from_millis(12)),
        }
    }

    #[test]
    fn test_change_keeps_response_and_identity() {
        let mut panel = panel();
        let id = panel.id().to_string();
        panel.apply_transport(&response_for(&id, 200));

        let edited = RequestData::new(HttpMethod::Post, "https://api.example.com/users")
            .with_payload("{}");
        let request = panel.apply_editor(EditorEvent::Change(edited)).clone();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.payload.as_deref(), Some("{}"));
        assert!(request.response.is_some());
        assert_eq!(panel.id(), id);
    }

    #[test]
    fn test_clear_overrides_request() {
        let mut panel = panel();
        let id = panel.id().to_string();
        panel.apply_transport(&response_for(&id, 200));

        let request = panel.apply_editor(EditorEvent::Clear(RequestData::empty())).clone();
        assert_eq!(request, RequestData::empty());
        assert_eq!(panel.state(), &RequestState::Idle);
    }

    #[test]
    fn test_transport_lifecycle() {
        let mut panel = panel();
        let id = panel.id().to_string();

        assert!(!panel.apply_transport(&TransportEvent::Requested { id: id.clone() }));
        assert!(panel.loading());

        assert!(panel.apply_transport(&response_for(&id, 201)));
        assert!(!panel.loading());
        assert_eq!(panel.state().response().map(|r| r.status), Some(201));
        assert!(panel.request().request.transport_request.is_some());
    }

    #[test]
    fn test_events_for_other_ids_are_ignored() {
        let mut panel = panel();
        assert!(!panel.apply_transport(&TransportEvent::Requested { id: "other".into() }));
        assert!(!panel.apply_transport(&response_for("other", 200)));
        assert!(!panel.loading());
        assert!(panel.request().request.response.is_none());
    }

    #[test]
    fn test_error_response_shows_message() {
        let mut panel = panel();
        let id = panel.id().to_string();
        panel.apply_transport(&TransportEvent::Response {
            id,
            request: None,
            response: TransportResponse::error("Request aborted"),
        });
        assert_eq!(
            panel.state(),
            &RequestState::Error {
                message: "Request aborted".into()
            }
        );
    }

    #[test]
    fn test_clear_response() {
        let mut panel = panel();
        let id = panel.id().to_string();
        panel.apply_transport(&response_for(&id, 200));

        panel.clear_response();
        assert!(panel.request().request.response.is_none());
        assert!(panel.request().request.transport_request.is_none());
        assert_eq!(panel.state(), &RequestState::Idle);
    }

    #[test]
    fn test_restores_last_response() {
        let mut request = RequestData::new(HttpMethod::Get, "https://x.dev");
        request.response = Some(TransportResponse::new(204, "No Content", Duration::ZERO));
        let panel = RequestPanel::new(WorkspaceRequest::new(request, TabId::generate()));
        assert_eq!(panel.state().response().map(|r| r.status), Some(204));
    }

    #[test]
    fn test_request_deleted_detaches() {
        let request = RequestData::new(HttpMethod::Get, "https://x.dev")
            .stored(meridian_domain::RequestKind::Saved, "saved-1");
        let mut panel = RequestPanel::new(WorkspaceRequest::new(request, TabId::generate()));

        assert!(!panel.request_deleted("saved-2"));
        assert!(panel.request_deleted("saved-1"));
        assert_eq!(panel.request().request.id, None);
        assert_eq!(panel.request().request.rev, None);
    }

    #[test]
    fn test_key_intents() {
        let mut panel = panel();
        let send = KeyPress::new(Key::Enter).with_ctrl();

        assert_eq!(panel.key_down(send), Some(PanelIntent::Send));
        assert_eq!(panel.key_down(send.in_body_editor()), None);
        assert_eq!(panel.key_down(KeyPress::new(Key::Enter)), None);
        assert_eq!(panel.key_down(KeyPress::new(Key::Escape)), None);

        let id = panel.id().to_string();
        panel.apply_transport(&TransportEvent::Requested { id });
        assert_eq!(panel.key_down(send), None);
        assert_eq!(panel.key_down(KeyPress::new(Key::Escape)), Some(PanelIntent::Abort));

        panel.abort();
        assert!(!panel.loading());
    }
}
