//! The tabbed workspace controller.

use std::sync::Arc;

use meridian_domain::{
    ImportBundle, RequestData, Tab, TabId, Workspace, WorkspaceMetaUpdate, WorkspaceRequest,
    WorkspaceSettings,
};

use super::{AddOptions, StoreDebouncer, TabSet};
use crate::error::ApplicationResult;
use crate::ports::WorkspaceStore;
use crate::transport::{TransportDispatch, TransportEvent};

/// Owns the open tabs of a workspace and their requests.
///
/// All mutations go through `&mut self`. Persistence is debounced: each
/// mutating call reschedules a single trailing write of the snapshot.
/// Operations that schedule writes must run inside a tokio runtime.
pub struct WorkspaceController<S> {
    tabs: TabSet,
    workspace: Workspace,
    store: Arc<S>,
    backend_id: String,
    debouncer: StoreDebouncer,
    transport: Option<Arc<dyn TransportDispatch>>,
    revision: u64,
}

impl<S> WorkspaceController<S>
where
    S: WorkspaceStore + 'static,
{
    /// Creates an empty controller persisting to `store`.
    #[must_use]
    pub fn new(store: Arc<S>, settings: &WorkspaceSettings) -> Self {
        Self {
            tabs: TabSet::new(),
            workspace: Workspace::new(),
            store,
            backend_id: settings.backend_id.clone(),
            debouncer: StoreDebouncer::new(settings.store_timeout()),
            transport: None,
            revision: 0,
        }
    }

    /// Attaches the transport used by the send/abort operations.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn TransportDispatch>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        self.tabs.tabs()
    }

    /// Open requests, in storage order.
    #[must_use]
    pub fn requests(&self) -> &[WorkspaceRequest] {
        self.tabs.requests()
    }

    /// The underlying tab set.
    #[must_use]
    pub const fn tab_set(&self) -> &TabSet {
        &self.tabs
    }

    /// Selected tab index.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.tabs.selected()
    }

    /// Request of the selected tab.
    #[must_use]
    pub fn selected_request(&self) -> Option<&WorkspaceRequest> {
        self.tabs.request_at_tab(self.tabs.selected()?)
    }

    /// Number of open tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true when no tab is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Counter bumped on every observable change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Store key of this workspace.
    #[must_use]
    pub fn backend_id(&self) -> &str {
        &self.backend_id
    }

    /// Adds a request and returns its index in the request list.
    ///
    /// Unless `skip_position_check` is set, the first empty request is
    /// overwritten instead of opening a new tab.
    pub fn add(&mut self, request: RequestData, options: AddOptions) -> usize {
        let (index, tab) = if options.skip_position_check {
            self.tabs.push(request)
        } else {
            match self.tabs.reuse_empty(request) {
                Ok(reused) => reused,
                Err(request) => self.tabs.push(request),
            }
        };
        tracing::debug!(index, tab = %tab, "Request added");
        if !options.no_auto_select {
            self.tabs.set_selected(self.tabs.index_of_tab(&tab));
        }
        self.changed(options.skip_update, options.skip_store);
        index
    }

    /// Adds an empty `GET` request.
    pub fn add_empty(&mut self) -> usize {
        self.add(RequestData::empty(), AddOptions::default())
    }

    /// Inserts a request at tab position `index`, shifting later tabs.
    ///
    /// The request is inserted at the same position of the request list.
    /// An index past the last tab behaves like [`Self::add`].
    pub fn add_at(&mut self, index: usize, request: RequestData, options: AddOptions) -> usize {
        if index >= self.tabs.len() {
            return self.add(request, options);
        }
        let tab = self.tabs.insert(index, request);
        tracing::debug!(index, tab = %tab, "Request inserted");
        if !options.no_auto_select {
            self.tabs.set_selected(self.tabs.index_of_tab(&tab));
        }
        self.changed(options.skip_update, options.skip_store);
        index
    }

    /// Closes the tab at `index` and drops its request.
    ///
    /// A request still in flight is aborted. The workspace is never left
    /// empty: closing the last tab opens a fresh empty one. With
    /// `ignore_selection` the selection is left alone and nothing is
    /// persisted.
    pub fn remove_request(&mut self, index: usize, ignore_selection: bool) {
        let Some(removed) = self.tabs.remove(index, !ignore_selection) else {
            return;
        };
        tracing::debug!(index, id = %removed.id, "Request removed");
        if let Some(transport) = &self.transport {
            transport.abort(&removed.id);
        }
        if self.tabs.is_empty() {
            self.tabs.push(RequestData::empty());
            self.tabs.set_selected(Some(0));
        }
        self.changed(false, ignore_selection);
    }

    /// First request index holding an empty request.
    #[must_use]
    pub fn find_empty_position(&self) -> Option<usize> {
        self.tabs.find_empty_position()
    }

    /// Selects the tab with the given id. Unknown ids and the already
    /// selected tab are ignored.
    pub fn select_by_tab_id(&mut self, tab: &TabId) {
        if let Some(index) = self.tabs.index_of_tab(tab) {
            self.select(index);
        }
    }

    /// Selects tab `index`. Returns false when nothing changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || self.tabs.selected() == Some(index) {
            return false;
        }
        self.tabs.set_selected(Some(index));
        self.changed(false, false);
        true
    }

    /// Schedules a debounced write of the current snapshot.
    pub fn store(&mut self) {
        let snapshot = self.workspace();
        self.debouncer
            .schedule(Arc::clone(&self.store), self.backend_id.clone(), snapshot);
    }

    /// Returns true while a debounced write is pending.
    #[must_use]
    pub fn has_pending_store(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Cancels the pending write and writes the snapshot now.
    ///
    /// # Errors
    ///
    /// Returns an error when the store rejects the write.
    pub async fn flush(&mut self) -> ApplicationResult<()> {
        self.debouncer.cancel();
        let snapshot = self.workspace();
        self.store.write(&self.backend_id, &snapshot).await?;
        tracing::debug!(backend_id = %self.backend_id, "Workspace flushed");
        Ok(())
    }

    /// Replaces the open tabs with the stored workspace.
    ///
    /// Missing or unreadable snapshots yield a fresh workspace with one
    /// empty tab. Returns the number of open tabs.
    pub async fn restore(&mut self) -> usize {
        self.debouncer.cancel();
        let workspace = match self.store.read(&self.backend_id).await {
            Ok(Some(workspace)) => workspace,
            Ok(None) => {
                tracing::debug!(backend_id = %self.backend_id, "No stored workspace");
                Workspace::new()
            }
            Err(error) => {
                tracing::warn!(
                    backend_id = %self.backend_id,
                    error = %error,
                    "Discarding stored workspace"
                );
                Workspace::new()
            }
        };
        self.process_workspace(workspace);
        self.tabs.len()
    }

    /// Loads a workspace snapshot into the controller.
    pub fn process_workspace(&mut self, mut workspace: Workspace) {
        self.tabs.clear();
        let requests = std::mem::take(&mut workspace.requests);
        let selected = workspace.selected.take();
        self.workspace = workspace;

        for request in requests {
            self.add(request, AddOptions::bulk());
        }
        if self.tabs.is_empty() {
            self.tabs.push(RequestData::empty());
        }
        let last = self.tabs.len() - 1;
        self.tabs
            .set_selected(Some(selected.unwrap_or_default().min(last)));
        tracing::debug!(
            id = %self.workspace.id,
            tabs = self.tabs.len(),
            "Workspace restored"
        );
        self.changed(false, true);
    }

    /// Closes every tab without persisting.
    pub fn clear(&mut self) {
        self.tabs.clear();
        self.changed(false, true);
    }

    /// Moves the tab at `from` to `to` together with its request.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        if from == to || !self.tabs.move_tab(from, to) {
            return false;
        }
        tracing::debug!(from, to, "Tab moved");
        self.changed(false, false);
        true
    }

    /// Replaces the request shown in `tab` with editor output.
    pub fn update_request(&mut self, tab: &TabId, request: RequestData) -> bool {
        if !self.tabs.update_request(tab, request) {
            return false;
        }
        self.changed(false, false);
        true
    }

    /// Opens a copy of tab `index` right after it. The copy is detached
    /// from the data store and has no response.
    pub fn duplicate_tab(&mut self, index: usize) -> Option<usize> {
        let mut copy = self.tabs.request_at_tab(index)?.request.clone();
        copy.detach_from_store();
        copy.clear_response();
        Some(self.add_at(index + 1, copy, AddOptions::default().appending()))
    }

    /// Tab index showing the stored request `data_store_id`.
    #[must_use]
    pub fn find_request_index(&self, data_store_id: &str) -> Option<usize> {
        self.tabs.tabs().iter().position(|tab| {
            self.tabs
                .request_for_tab(&tab.id)
                .is_some_and(|r| r.request.id.as_deref() == Some(data_store_id))
        })
    }

    /// Closes the selected tab.
    pub fn close_active_tab(&mut self) {
        if let Some(selected) = self.tabs.selected() {
            self.remove_request(selected, false);
        }
    }

    /// Detaches open requests from a stored request that was deleted.
    /// Returns how many open requests were affected.
    pub fn request_deleted(&mut self, data_store_id: &str) -> usize {
        let tabs: Vec<TabId> = self
            .tabs
            .requests()
            .iter()
            .filter(|r| r.request.id.as_deref() == Some(data_store_id))
            .map(|r| r.tab.clone())
            .collect();
        for tab in &tabs {
            if let Some(entry) = self.tabs.request_for_tab_mut(tab) {
                entry.request.detach_from_store();
            }
        }
        if !tabs.is_empty() {
            self.changed(false, false);
        }
        tabs.len()
    }

    /// Appends the requests of a data import. Returns how many were added.
    pub fn append_import_requests(&mut self, bundle: ImportBundle) -> usize {
        let requests = bundle.into_requests();
        let count = requests.len();
        let options = AddOptions::default().appending().without_select();
        for request in requests {
            self.add(
                request,
                AddOptions {
                    skip_store: true,
                    skip_update: true,
                    ..options
                },
            );
        }
        if count > 0 {
            self.changed(false, false);
        }
        count
    }

    /// Replaces every open tab with `requests`, selecting the first.
    pub(crate) fn replace_all(&mut self, requests: Vec<RequestData>) -> usize {
        self.tabs.clear();
        for request in requests {
            self.add(request, AddOptions::bulk());
        }
        if self.tabs.is_empty() {
            self.tabs.push(RequestData::empty());
        }
        self.tabs.set_selected(Some(0));
        self.changed(false, false);
        self.tabs.len()
    }

    /// Sends the request of the selected tab.
    pub fn send_current(&self) -> bool {
        let (Some(transport), Some(current)) = (&self.transport, self.selected_request()) else {
            return false;
        };
        transport.send(&current.id, current.request.clone())
    }

    /// Aborts the request of the selected tab.
    pub fn abort_current(&self) -> bool {
        let (Some(transport), Some(current)) = (&self.transport, self.selected_request()) else {
            return false;
        };
        transport.abort(&current.id)
    }

    /// Aborts every in-flight request.
    pub fn abort_all(&self) -> usize {
        self.transport.as_ref().map_or(0, |t| t.abort_all())
    }

    /// Clears the response of the selected tab.
    pub fn clear_current(&mut self) -> bool {
        let Some(tab) = self.tabs.selected().and_then(|i| self.tabs.tabs().get(i)) else {
            return false;
        };
        let tab = tab.id.clone();
        let Some(entry) = self.tabs.request_for_tab_mut(&tab) else {
            return false;
        };
        entry.request.clear_response();
        self.changed(false, false);
        true
    }

    /// Routes a transport response to the request with the same id.
    /// Returns false for other events and unknown ids.
    pub fn apply_transport_event(&mut self, event: &TransportEvent) -> bool {
        let TransportEvent::Response {
            id,
            request,
            response,
        } = event
        else {
            return false;
        };
        let Some(entry) = self.tabs.request_by_id_mut(id) else {
            tracing::debug!(id = %id, "Response for a closed request");
            return false;
        };
        entry.request.transport_request.clone_from(request);
        entry.request.response = Some(response.clone());
        self.changed(false, false);
        true
    }

    /// Snapshot with requests in tab order and the current selection.
    #[must_use]
    pub fn workspace(&self) -> Workspace {
        let mut snapshot = self.workspace.clone();
        snapshot.requests = self.tabs.ordered_requests();
        snapshot.selected = self.tabs.selected();
        snapshot
    }

    /// Merges editor form values into the workspace metadata.
    pub fn update_meta(&mut self, update: WorkspaceMetaUpdate) {
        self.workspace.apply_meta_update(update);
        self.changed(false, false);
    }

    fn changed(&mut self, skip_update: bool, skip_store: bool) {
        if !skip_update {
            self.revision += 1;
        }
        if !skip_store {
            self.store();
        }
    }
}
