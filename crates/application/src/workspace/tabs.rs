//! Parallel tab and request lists.
//!
//! Tabs and requests are two independently ordered vectors linked only by
//! [`WorkspaceRequest::tab`]. Tab order is the display and persistence
//! order. Every mutation here keeps both sides in one-to-one
//! correspondence.

use meridian_domain::{RequestData, Tab, TabId, WorkspaceRequest};

/// The live tab strip state of a workspace.
#[derive(Debug, Clone, Default)]
pub struct TabSet {
    tabs: Vec<Tab>,
    requests: Vec<WorkspaceRequest>,
    selected: Option<usize>,
}

impl TabSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Requests in storage order (not necessarily tab order).
    #[must_use]
    pub fn requests(&self) -> &[WorkspaceRequest] {
        &self.requests
    }

    /// Selected tab index.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true when there are no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Sets the selected tab. Out of range indexes clear the selection.
    pub fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.tabs.len());
    }

    /// Appends a tab and its request. Returns the request index and tab id.
    pub fn push(&mut self, request: RequestData) -> (usize, TabId) {
        let tab = Tab::for_request(&request);
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.requests.push(WorkspaceRequest::new(request, id.clone()));
        (self.requests.len() - 1, id)
    }

    /// Inserts a tab at `index` and its request at the same position.
    ///
    /// `index` must be in bounds (`<= len`). The selection is shifted so it
    /// keeps pointing at the same tab.
    pub fn insert(&mut self, index: usize, request: RequestData) -> TabId {
        let index = index.min(self.tabs.len());
        let tab = Tab::for_request(&request);
        let id = tab.id.clone();
        self.tabs.insert(index, tab);
        let position = index.min(self.requests.len());
        self.requests
            .insert(position, WorkspaceRequest::new(request, id.clone()));
        if let Some(selected) = self.selected
            && selected >= index
        {
            self.selected = Some(selected + 1);
        }
        id
    }

    /// Overwrites the first empty request with `request`.
    ///
    /// Returns the request index and tab id, or gives the request back when
    /// no empty request exists.
    pub fn reuse_empty(&mut self, request: RequestData) -> Result<(usize, TabId), RequestData> {
        let Some(index) = self.find_empty_position() else {
            return Err(request);
        };
        let tab = self.requests[index].tab.clone();
        self.requests[index].request = request;
        self.refresh_label(&tab);
        Ok((index, tab))
    }

    /// Removes the tab at `index` together with its request.
    ///
    /// When `adjust_selection` is set the selection is re-derived: removing
    /// the selected tab selects the previous one (or the first), removing a
    /// tab before it shifts it down, and an empty set has no selection.
    pub fn remove(&mut self, index: usize, adjust_selection: bool) -> Option<WorkspaceRequest> {
        if index >= self.tabs.len() {
            return None;
        }
        let tab = self.tabs.remove(index);
        let removed = self
            .requests
            .iter()
            .position(|r| r.tab == tab.id)
            .map(|position| self.requests.remove(position));

        if adjust_selection {
            self.selected = match self.selected {
                _ if self.tabs.is_empty() => None,
                Some(selected) if selected == index => Some(index.saturating_sub(1)),
                Some(selected) if selected > index => Some(selected - 1),
                other => other,
            };
        }
        if let Some(selected) = self.selected
            && selected >= self.tabs.len()
        {
            self.selected = self.tabs.len().checked_sub(1);
        }
        removed
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.tabs.clear();
        self.requests.clear();
        self.selected = None;
    }

    /// First request index holding an empty request.
    #[must_use]
    pub fn find_empty_position(&self) -> Option<usize> {
        self.requests.iter().position(|r| r.request.is_empty())
    }

    /// Current tab index of `tab`.
    #[must_use]
    pub fn index_of_tab(&self, tab: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == *tab)
    }

    /// Request linked to `tab`.
    #[must_use]
    pub fn request_for_tab(&self, tab: &TabId) -> Option<&WorkspaceRequest> {
        self.requests.iter().find(|r| r.tab == *tab)
    }

    /// Mutable request linked to `tab`.
    pub fn request_for_tab_mut(&mut self, tab: &TabId) -> Option<&mut WorkspaceRequest> {
        self.requests.iter_mut().find(|r| r.tab == *tab)
    }

    /// Request rendered in tab `index`.
    #[must_use]
    pub fn request_at_tab(&self, index: usize) -> Option<&WorkspaceRequest> {
        let tab = self.tabs.get(index)?;
        self.request_for_tab(&tab.id)
    }

    /// Request with the given editor id.
    #[must_use]
    pub fn request_by_id(&self, id: &str) -> Option<&WorkspaceRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Mutable request with the given editor id.
    pub fn request_by_id_mut(&mut self, id: &str) -> Option<&mut WorkspaceRequest> {
        self.requests.iter_mut().find(|r| r.id == id)
    }

    /// Replaces the request linked to `tab` and relabels the tab.
    pub fn update_request(&mut self, tab: &TabId, request: RequestData) -> bool {
        let Some(entry) = self.request_for_tab_mut(tab) else {
            return false;
        };
        entry.request = request;
        self.refresh_label(tab);
        true
    }

    /// Recomputes the label of `tab` from its request.
    pub fn refresh_label(&mut self, tab: &TabId) {
        let Some(label) = self
            .request_for_tab(tab)
            .map(|r| r.request.label().to_string())
        else {
            return;
        };
        if let Some(entry) = self.tabs.iter_mut().find(|t| t.id == *tab) {
            entry.label = label;
        }
    }

    /// Moves the tab at `from` to `to`, carrying its request along.
    ///
    /// The selection keeps pointing at the same tab.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        let len = self.tabs.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }
        let tab = self.tabs.remove(from);
        if let Some(position) = self.requests.iter().position(|r| r.tab == tab.id) {
            let request = self.requests.remove(position);
            let target = to.min(self.requests.len());
            self.requests.insert(target, request);
        }
        self.tabs.insert(to, tab);

        self.selected = self.selected.map(|selected| {
            if selected == from {
                to
            } else if from < selected && selected <= to {
                selected - 1
            } else if to <= selected && selected < from {
                selected + 1
            } else {
                selected
            }
        });
        true
    }

    /// Request payloads in tab order, resolved through the tab link.
    #[must_use]
    pub fn ordered_requests(&self) -> Vec<RequestData> {
        self.tabs
            .iter()
            .filter_map(|tab| self.request_for_tab(&tab.id))
            .map(|r| r.request.clone())
            .collect()
    }

    /// Checks the one-to-one tab/request correspondence.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.tabs.len() == self.requests.len()
            && self
                .tabs
                .iter()
                .all(|tab| self.requests.iter().filter(|r| r.tab == tab.id).count() == 1)
            && self.selected.is_none_or(|s| s < self.tabs.len())
    }

    #[cfg(test)]
    pub(crate) fn requests_mut_for_test(&mut self) -> &mut Vec<WorkspaceRequest> {
        &mut self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_domain::HttpMethod;
    use pretty_assertions::assert_eq;

    fn request(url: &str) -> RequestData {
        RequestData::new(HttpMethod::Get, url)
    }

    fn set_of(urls: &[&str]) -> TabSet {
        let mut set = TabSet::new();
        for url in urls {
            set.push(request(url));
        }
        set
    }

    fn urls(set: &TabSet) -> Vec<String> {
        set.ordered_requests().into_iter().map(|r| r.url).collect()
    }

    #[test]
    fn test_push_links_tab_and_request() {
        let set = set_of(&["https://a.dev", "https://b.dev"]);
        assert_eq!(set.len(), 2);
        assert!(set.is_consistent());
        assert_eq!(set.tabs()[1].label, "https://b.dev");
    }

    #[test]
    fn test_insert_shifts_selection() {
        let mut set = set_of(&["https://a.dev", "https://b.dev"]);
        set.set_selected(Some(1));
        set.insert(0, request("https://c.dev"));
        assert_eq!(set.selected(), Some(2));
        assert_eq!(urls(&set), vec!["https://c.dev", "https://a.dev", "https://b.dev"]);
        assert!(set.is_consistent());
    }

    #[test]
    fn test_remove_selected_selects_previous() {
        let mut set = set_of(&["https://a.dev", "https://b.dev", "https://c.dev"]);
        set.set_selected(Some(2));
        set.remove(2, true);
        assert_eq!(set.selected(), Some(1));
    }

    #[test]
    fn test_remove_first_selected_stays_at_zero() {
        let mut set = set_of(&["https://a.dev", "https://b.dev"]);
        set.set_selected(Some(0));
        set.remove(0, true);
        assert_eq!(set.selected(), Some(0));
        assert_eq!(urls(&set), vec!["https://b.dev"]);
    }

    #[test]
    fn test_remove_before_selected_decrements() {
        let mut set = set_of(&["https://a.dev", "https://b.dev", "https://c.dev"]);
        set.set_selected(Some(2));
        set.remove(0, true);
        assert_eq!(set.selected(), Some(1));
    }

    #[test]
    fn test_remove_after_selected_keeps_selection() {
        let mut set = set_of(&["https://a.dev", "https://b.dev", "https://c.dev"]);
        set.set_selected(Some(0));
        set.remove(2, true);
        assert_eq!(set.selected(), Some(0));
    }

    #[test]
    fn test_remove_last_tab_clears_selection() {
        let mut set = set_of(&["https://a.dev"]);
        set.set_selected(Some(0));
        set.remove(0, true);
        assert_eq!(set.selected(), None);
        assert!(set.is_empty());
        assert!(set.is_consistent());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut set = set_of(&["https://a.dev"]);
        assert!(set.remove(4, true).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_find_empty_position() {
        let mut set = set_of(&["https://a.dev"]);
        assert_eq!(set.find_empty_position(), None);
        set.push(RequestData::empty());
        set.push(RequestData::empty());
        assert_eq!(set.find_empty_position(), Some(1));
    }

    #[test]
    fn test_update_request_relabels_tab() {
        let mut set = set_of(&["https://a.dev"]);
        let tab = set.tabs()[0].id.clone();
        assert!(set.update_request(&tab, request("https://z.dev").with_name("Zed")));
        assert_eq!(set.tabs()[0].label, "Zed");
        assert!(!set.update_request(&TabId::from("missing"), request("https://x.dev")));
    }

    #[test]
    fn test_move_tab_carries_request_and_selection() {
        let mut set = set_of(&["https://a.dev", "https://b.dev", "https://c.dev"]);
        set.set_selected(Some(0));
        assert!(set.move_tab(0, 2));
        assert_eq!(urls(&set), vec!["https://b.dev", "https://c.dev", "https://a.dev"]);
        assert_eq!(set.selected(), Some(2));
        assert!(set.is_consistent());

        set.set_selected(Some(1));
        assert!(set.move_tab(2, 0));
        assert_eq!(set.selected(), Some(2));
        assert!(!set.move_tab(0, 9));
    }

    #[test]
    fn test_ordered_requests_follow_tabs_not_storage() {
        let mut set = set_of(&["https://a.dev", "https://b.dev", "https://c.dev"]);
        set.requests_mut_for_test().reverse();
        assert_eq!(urls(&set), vec!["https://a.dev", "https://b.dev", "https://c.dev"]);

        set.requests_mut_for_test().rotate_left(1);
        set.remove(1, true);
        assert_eq!(urls(&set), vec!["https://a.dev", "https://c.dev"]);
        assert!(set.is_consistent());
    }
}
