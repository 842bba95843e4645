//! Selection set and bulk-action coordinator
//!
//! Selection is a set of archive ids shared across view modes. Bulk
//! actions issue one request per selected id, concurrently, and report an
//! aggregate success/failure summary; per-id failure detail is not
//! surfaced.

use futures::future::join_all;
use reqwest::Method;
use std::collections::BTreeSet;
use std::sync::Arc;

use printbay_protocol::{
    api::{AssignProjectRequest, SetFavoriteRequest, UpdateTagsRequest},
    Archive,
};
use validator::Validate;

use crate::cache::ResourceCache;
use crate::client::ApiClient;
use crate::error::{PrintBayError, Result};
use crate::ui::UI;

/// Client-side multi-select state.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: BTreeSet<i64>,
    active: bool,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symmetric toggle: absent becomes present, present becomes absent.
    pub fn toggle(&mut self, id: i64) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
        self.active = true;
    }

    /// Replace the selection with the currently filtered list, so bulk
    /// operations respect the active filter and collection view.
    pub fn select_all(&mut self, filtered: &[Archive]) {
        self.ids = filtered.iter().map(|a| a.id).collect();
        self.active = true;
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.ids.extend(ids);
        self.active = true;
    }

    /// Reset both the set and the selection-mode flag.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.active = false;
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }
}

/// A mutation applied to every selected archive.
#[derive(Debug, Clone)]
pub enum BulkAction {
    Delete,
    SetFavorite(bool),
    SetTags(String),
    AssignProject(Option<i64>),
}

impl BulkAction {
    fn describe(&self) -> &'static str {
        match self {
            BulkAction::Delete => "delete",
            BulkAction::SetFavorite(_) => "favorite",
            BulkAction::SetTags(_) => "tag",
            BulkAction::AssignProject(_) => "project assignment",
        }
    }
}

/// Aggregate result of one bulk dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

impl BulkOutcome {
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Dispatches bulk operations against the selected set.
pub struct BulkService<C: ApiClient> {
    client: Arc<C>,
    progress_enabled: bool,
    ui: UI,
}

impl<C: ApiClient> BulkService<C> {
    pub fn new(client: Arc<C>, progress_enabled: bool) -> Self {
        Self {
            client,
            progress_enabled,
            ui: UI::new(),
        }
    }

    /// Run `action` against every id in `selection`, one request per id.
    ///
    /// Requests fan out concurrently; there is no protocol-level batching.
    /// The cached archive list is invalidated afterwards regardless of
    /// partial failure so the next read refetches.
    pub async fn dispatch(
        &self,
        selection: &SelectionSet,
        action: BulkAction,
        cache: &mut ResourceCache,
    ) -> Result<BulkOutcome> {
        if selection.is_empty() {
            return Err(PrintBayError::empty_selection());
        }

        if let BulkAction::SetTags(tags) = &action {
            UpdateTagsRequest { tags: tags.clone() }.validate()?;
        }

        let ids = selection.ids();
        tracing::debug!(count = ids.len(), action = action.describe(), "bulk dispatch");

        let progress_bar = if self.progress_enabled {
            Some(crate::ui::create_progress_bar(
                ids.len() as u64,
                &format!("Applying {}...", action.describe()),
            ))
        } else {
            None
        };

        let requests = ids.iter().map(|&id| {
            let action = action.clone();
            async move { self.apply_one(id, &action).await }
        });
        let results = join_all(requests).await;

        let mut outcome = BulkOutcome {
            succeeded: 0,
            failed: 0,
        };
        for result in results {
            match result {
                Ok(()) => outcome.succeeded += 1,
                Err(e) => {
                    tracing::debug!(error = %e, "bulk item failed");
                    outcome.failed += 1;
                }
            }
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        cache.invalidate_family("archives");

        if outcome.all_ok() {
            self.ui.success(&format!(
                "Applied {} to {} archive(s)",
                action.describe(),
                outcome.succeeded
            ));
        } else {
            self.ui.warning(&format!(
                "Bulk {}: {} succeeded, {} failed",
                action.describe(),
                outcome.succeeded,
                outcome.failed
            ));
        }

        Ok(outcome)
    }

    async fn apply_one(&self, id: i64, action: &BulkAction) -> Result<()> {
        match action {
            BulkAction::Delete => {
                self.client
                    .request::<(), serde_json::Value>(
                        Method::DELETE,
                        &format!("archives/{}", id),
                        None,
                    )
                    .await?;
            }
            BulkAction::SetFavorite(favorite) => {
                self.client
                    .request::<SetFavoriteRequest, serde_json::Value>(
                        Method::PUT,
                        &format!("archives/{}/favorite", id),
                        Some(&SetFavoriteRequest {
                            favorite: *favorite,
                        }),
                    )
                    .await?;
            }
            BulkAction::SetTags(tags) => {
                self.client
                    .request::<UpdateTagsRequest, serde_json::Value>(
                        Method::PUT,
                        &format!("archives/{}/tags", id),
                        Some(&UpdateTagsRequest { tags: tags.clone() }),
                    )
                    .await?;
            }
            BulkAction::AssignProject(project_id) => {
                self.client
                    .request::<AssignProjectRequest, serde_json::Value>(
                        Method::PUT,
                        &format!("archives/{}/project", id),
                        Some(&AssignProjectRequest {
                            project_id: *project_id,
                        }),
                    )
                    .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockApiClient;
    use crate::tests::utils::test_helpers::archive;
    use printbay_protocol::PrintStatus;
    use serde_json::json;

    #[test]
    fn test_toggle_is_symmetric() {
        let mut selection = SelectionSet::new();
        selection.toggle(7);
        assert!(selection.contains(7));
        selection.toggle(7);
        assert!(!selection.contains(7));
        assert!(selection.is_active());
    }

    #[test]
    fn test_select_all_replaces_and_scopes_to_filtered() {
        let mut selection = SelectionSet::new();
        selection.toggle(1);
        selection.toggle(2);

        let filtered = vec![
            archive(3, "a", PrintStatus::Completed),
            archive(4, "b", PrintStatus::Completed),
            archive(5, "c", PrintStatus::Completed),
        ];
        selection.select_all(&filtered);

        assert_eq!(selection.ids(), vec![3, 4, 5]);
        assert!(!selection.contains(1));
    }

    #[test]
    fn test_clear_resets_set_and_mode_flag() {
        let mut selection = SelectionSet::new();
        selection.toggle(1);
        selection.clear();
        assert!(selection.is_empty());
        assert!(!selection.is_active());
    }

    #[tokio::test]
    async fn test_dispatch_rejects_empty_selection() {
        let client = Arc::new(MockApiClient::new());
        let service = BulkService::new(client, false);
        let mut cache = ResourceCache::new(std::time::Duration::from_secs(30));

        let result = service
            .dispatch(&SelectionSet::new(), BulkAction::Delete, &mut cache)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_counts_and_invalidates_cache() {
        let client = MockApiClient::new();
        client.add_response("archives/1/favorite", json!({}));
        client.add_response("archives/2/favorite", json!({}));
        client.fail_endpoint("archives/3/favorite");
        let client = Arc::new(client);

        let mut cache = ResourceCache::new(std::time::Duration::from_secs(30));
        cache.put("archives", &json!([1, 2, 3])).unwrap();
        cache.put("archives:printer:2", &json!([2])).unwrap();

        let mut selection = SelectionSet::new();
        selection.extend([1, 2, 3]);

        let service = BulkService::new(client, false);
        let outcome = service
            .dispatch(&selection, BulkAction::SetFavorite(true), &mut cache)
            .await
            .unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 1);
        assert!(!outcome.all_ok());
        assert!(cache.get::<serde_json::Value>("archives").is_none());
        assert!(cache
            .get::<serde_json::Value>("archives:printer:2")
            .is_none());
    }

    #[tokio::test]
    async fn test_dispatch_validates_tag_payload() {
        let client = Arc::new(MockApiClient::new());
        let mut cache = ResourceCache::new(std::time::Duration::from_secs(30));
        let mut selection = SelectionSet::new();
        selection.toggle(1);

        let service = BulkService::new(client, false);
        let oversized = "x".repeat(2048);
        let result = service
            .dispatch(&selection, BulkAction::SetTags(oversized), &mut cache)
            .await;
        assert!(result.is_err());
    }
}
