//! Opening saved, history and project requests from the data store.
//!
//! Missing records are skipped. Store failures are logged and leave the
//! workspace untouched.

use meridian_domain::{RequestData, RequestKind};

use super::{AddOptions, WorkspaceController};
use crate::ports::{RequestSource, RequestSourceError, WorkspaceStore};

impl<S> WorkspaceController<S>
where
    S: WorkspaceStore + 'static,
{
    /// Opens a stored request. Returns its request index.
    pub async fn add_by_request_id<Q: RequestSource>(
        &mut self,
        source: &Q,
        kind: RequestKind,
        id: &str,
    ) -> Option<usize> {
        let request = read_one(source, kind, id).await?;
        Some(self.add(request, AddOptions::default()))
    }

    /// Opens several stored requests. Returns how many were opened.
    pub async fn add_by_request_ids<Q: RequestSource>(
        &mut self,
        source: &Q,
        kind: RequestKind,
        ids: &[String],
    ) -> usize {
        let requests = read_many(source.read_requests(kind, ids).await, "requests");
        let count = requests.len();
        for request in requests {
            self.add(request, AddOptions::default());
        }
        count
    }

    /// Opens a stored request at tab position `index`.
    pub async fn add_at_by_request_id<Q: RequestSource>(
        &mut self,
        source: &Q,
        kind: RequestKind,
        id: &str,
        index: usize,
    ) -> Option<usize> {
        let request = read_one(source, kind, id).await?;
        Some(self.add_at(index, request, AddOptions::default()))
    }

    /// Replaces the request of the selected tab with a stored request.
    /// Opens a new tab when nothing is selected.
    pub async fn replace_by_request_id<Q: RequestSource>(
        &mut self,
        source: &Q,
        kind: RequestKind,
        id: &str,
    ) -> bool {
        let Some(request) = read_one(source, kind, id).await else {
            return false;
        };
        let selected = self
            .selected()
            .and_then(|index| self.tabs().get(index))
            .map(|tab| tab.id.clone());
        match selected {
            Some(tab) => self.update_request(&tab, request),
            None => {
                self.add(request, AddOptions::default());
                true
            }
        }
    }

    /// Replaces every open tab with the given stored requests.
    /// Returns how many tabs are open afterwards.
    pub async fn replace_by_request_ids<Q: RequestSource>(
        &mut self,
        source: &Q,
        kind: RequestKind,
        ids: &[String],
    ) -> usize {
        let requests = read_many(source.read_requests(kind, ids).await, "requests");
        if requests.is_empty() {
            return self.len();
        }
        self.replace_all(requests)
    }

    /// Opens the requests of a project, appending them or inserting them
    /// from tab position `index`. Returns how many were opened.
    pub async fn append_by_project_id<Q: RequestSource>(
        &mut self,
        source: &Q,
        project_id: &str,
        index: Option<usize>,
    ) -> usize {
        let requests = read_many(source.read_project_requests(project_id).await, "project");
        let count = requests.len();
        match index {
            Some(start) => {
                for (offset, request) in requests.into_iter().enumerate() {
                    self.add_at(start + offset, request, AddOptions::default());
                }
            }
            None => {
                for request in requests {
                    self.add(request, AddOptions::default());
                }
            }
        }
        count
    }

    /// Replaces every open tab with the requests of a project.
    /// Returns how many tabs are open afterwards.
    pub async fn replace_by_project_id<Q: RequestSource>(
        &mut self,
        source: &Q,
        project_id: &str,
    ) -> usize {
        let requests = read_many(source.read_project_requests(project_id).await, "project");
        if requests.is_empty() {
            return self.len();
        }
        self.replace_all(requests)
    }
}

async fn read_one<Q: RequestSource>(source: &Q, kind: RequestKind, id: &str) -> Option<RequestData> {
    match source.read_request(kind, id).await {
        Ok(Some(request)) => Some(request),
        Ok(None) => {
            tracing::debug!(kind = %kind, id = %id, "Stored request not found");
            None
        }
        Err(error) => {
            tracing::warn!(kind = %kind, id = %id, error = %error, "Unable to read request");
            None
        }
    }
}

fn read_many(
    result: Result<Vec<RequestData>, RequestSourceError>,
    what: &str,
) -> Vec<RequestData> {
    result.unwrap_or_else(|error| {
        tracing::warn!(error = %error, "Unable to read {what}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::WorkspaceStoreError;
    use meridian_domain::{HttpMethod, Workspace, WorkspaceSettings};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct NullStore;

    impl WorkspaceStore for NullStore {
        async fn read(&self, _id: &str) -> Result<Option<Workspace>, WorkspaceStoreError> {
            Ok(None)
        }

        async fn write(&self, _id: &str, _workspace: &Workspace) -> Result<(), WorkspaceStoreError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FixtureSource {
        saved: HashMap<String, RequestData>,
        projects: HashMap<String, Vec<String>>,
        offline: bool,
    }

    impl FixtureSource {
        fn with_saved(urls: &[(&str, &str)]) -> Self {
            let saved = urls
                .iter()
                .map(|(id, url)| {
                    let request =
                        RequestData::new(HttpMethod::Get, *url).stored(RequestKind::Saved, *id);
                    ((*id).to_string(), request)
                })
                .collect();
            Self {
                saved,
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), RequestSourceError> {
            if self.offline {
                Err(RequestSourceError::Unavailable("offline".into()))
            } else {
                Ok(())
            }
        }
    }

    impl RequestSource for FixtureSource {
        async fn read_request(
            &self,
            _kind: RequestKind,
            id: &str,
        ) -> Result<Option<RequestData>, RequestSourceError> {
            self.check()?;
            Ok(self.saved.get(id).cloned())
        }

        async fn read_requests(
            &self,
            _kind: RequestKind,
            ids: &[String],
        ) -> Result<Vec<RequestData>, RequestSourceError> {
            self.check()?;
            Ok(ids.iter().filter_map(|id| self.saved.get(id).cloned()).collect())
        }

        async fn read_project_requests(
            &self,
            project_id: &str,
        ) -> Result<Vec<RequestData>, RequestSourceError> {
            self.check()?;
            let ids = self.projects.get(project_id).cloned().unwrap_or_default();
            Ok(ids.iter().filter_map(|id| self.saved.get(id).cloned()).collect())
        }
    }

    fn controller() -> WorkspaceController<NullStore> {
        let mut controller =
            WorkspaceController::new(Arc::new(NullStore), &WorkspaceSettings::default());
        controller.add_empty();
        controller
    }

    fn urls(controller: &WorkspaceController<NullStore>) -> Vec<String> {
        controller.workspace().requests.into_iter().map(|r| r.url).collect()
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_add_by_request_id_fills_empty_tab() {
        let source = FixtureSource::with_saved(&[("a", "https://a.dev")]);
        let mut c = controller();

        assert_eq!(c.add_by_request_id(&source, RequestKind::Saved, "a").await, Some(0));
        assert_eq!(urls(&c), vec!["https://a.dev"]);
        assert_eq!(c.add_by_request_id(&source, RequestKind::Saved, "zzz").await, None);
    }

    #[tokio::test]
    async fn test_add_by_request_ids_skips_missing() {
        let source = FixtureSource::with_saved(&[("a", "https://a.dev"), ("b", "https://b.dev")]);
        let mut c = controller();

        let added = c
            .add_by_request_ids(&source, RequestKind::Saved, &ids(&["a", "missing", "b"]))
            .await;
        assert_eq!(added, 2);
        assert_eq!(urls(&c), vec!["https://a.dev", "https://b.dev"]);
        assert_eq!(c.selected(), Some(1));
    }

    #[tokio::test]
    async fn test_add_at_by_request_id() {
        let source = FixtureSource::with_saved(&[("a", "https://a.dev")]);
        let mut c = controller();
        c.add(RequestData::new(HttpMethod::Get, "https://x.dev"), AddOptions::default());
        c.add(RequestData::new(HttpMethod::Get, "https://y.dev"), AddOptions::default());

        assert_eq!(
            c.add_at_by_request_id(&source, RequestKind::Saved, "a", 1).await,
            Some(1)
        );
        assert_eq!(urls(&c), vec!["https://x.dev", "https://a.dev", "https://y.dev"]);
    }

    #[tokio::test]
    async fn test_replace_by_request_id_replaces_selected() {
        let source = FixtureSource::with_saved(&[("a", "https://a.dev")]);
        let mut c = controller();
        c.add(RequestData::new(HttpMethod::Get, "https://x.dev"), AddOptions::default());
        c.add(RequestData::new(HttpMethod::Get, "https://y.dev"), AddOptions::default());
        c.select(0);

        assert!(c.replace_by_request_id(&source, RequestKind::Saved, "a").await);
        assert_eq!(urls(&c), vec!["https://a.dev", "https://y.dev"]);
        assert_eq!(c.tabs()[0].label, "https://a.dev");
    }

    #[tokio::test]
    async fn test_replace_by_request_ids_replaces_everything() {
        let source = FixtureSource::with_saved(&[("a", "https://a.dev"), ("b", "https://b.dev")]);
        let mut c = controller();
        c.add(RequestData::new(HttpMethod::Get, "https://x.dev"), AddOptions::default());

        let open = c
            .replace_by_request_ids(&source, RequestKind::Saved, &ids(&["b", "a"]))
            .await;
        assert_eq!(open, 2);
        assert_eq!(urls(&c), vec!["https://b.dev", "https://a.dev"]);
        assert_eq!(c.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_project_loading() {
        let mut source = FixtureSource::with_saved(&[
            ("a", "https://a.dev"),
            ("b", "https://b.dev"),
            ("c", "https://c.dev"),
        ]);
        source.projects.insert("p1".into(), ids(&["a", "b"]));
        let mut c = controller();
        c.add(RequestData::new(HttpMethod::Get, "https://x.dev"), AddOptions::default());
        c.add(RequestData::new(HttpMethod::Get, "https://y.dev"), AddOptions::default());

        assert_eq!(c.append_by_project_id(&source, "p1", Some(1)).await, 2);
        assert_eq!(
            urls(&c),
            vec!["https://x.dev", "https://a.dev", "https://b.dev", "https://y.dev"]
        );

        assert_eq!(c.replace_by_project_id(&source, "p1").await, 2);
        assert_eq!(urls(&c), vec!["https://a.dev", "https://b.dev"]);

        assert_eq!(c.append_by_project_id(&source, "missing", None).await, 0);
        assert_eq!(c.len(), 2);
    }

    #[tokio::test]
    async fn test_source_failure_changes_nothing() {
        let source = FixtureSource {
            offline: true,
            ..FixtureSource::with_saved(&[("a", "https://a.dev")])
        };
        let mut c = controller();
        c.add(RequestData::new(HttpMethod::Get, "https://x.dev"), AddOptions::default());

        assert_eq!(c.add_by_request_id(&source, RequestKind::Saved, "a").await, None);
        assert_eq!(c.replace_by_request_ids(&source, RequestKind::Saved, &ids(&["a"])).await, 1);
        assert_eq!(c.replace_by_project_id(&source, "p1").await, 1);
        assert_eq!(urls(&c), vec!["https://x.dev"]);
    }
}
