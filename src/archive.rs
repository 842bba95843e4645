//! Archive listing and per-archive mutations
//!
//! Reads go through the resource cache; every mutation invalidates the
//! archive resource so the next read refetches the committed server
//! state. There is no local optimistic mutation of the cached list.

use reqwest::Method;
use validator::Validate;

use printbay_protocol::{
    api::{
        ArchiveListResponse, AssignProjectRequest, ProjectListResponse, SetFavoriteRequest,
        TagListResponse, UpdateTagsRequest,
    },
    Archive, ProjectListItem, TagInfo,
};

use crate::cache::ResourceCache;
use crate::client::ApiClient;
use crate::error::{PrintBayError, Result};

const ARCHIVES_RESOURCE: &str = "archives";

/// Archive operations against the farm API.
pub struct ArchiveService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> ArchiveService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch the archive list, optionally scoped to one printer.
    ///
    /// A fresh cached snapshot short-circuits the request; the printer
    /// scope is part of the resource key so scoped and unscoped lists
    /// never shadow each other.
    pub async fn list(
        &self,
        cache: &mut ResourceCache,
        printer_id: Option<i64>,
    ) -> Result<Vec<Archive>> {
        let resource = match printer_id {
            Some(id) => format!("{}:printer:{}", ARCHIVES_RESOURCE, id),
            None => ARCHIVES_RESOURCE.to_string(),
        };

        if let Some(archives) = cache.get::<Vec<Archive>>(&resource) {
            tracing::debug!(resource, "archive list served from cache");
            return Ok(archives);
        }

        let endpoint = match printer_id {
            Some(id) => format!("archives?printer_id={}", id),
            None => "archives".to_string(),
        };

        let response: ArchiveListResponse = self
            .client
            .request::<(), ArchiveListResponse>(Method::GET, &endpoint, None)
            .await?
            .into_data()?;

        cache.put(&resource, &response.archives)?;
        Ok(response.archives)
    }

    pub async fn get(&self, id: i64) -> Result<Archive> {
        let response = self
            .client
            .request::<(), Archive>(Method::GET, &format!("archives/{}", id), None)
            .await?;
        response
            .into_data()
            .map_err(|_| PrintBayError::archive_not_found(id))
    }

    pub async fn delete(&self, id: i64, cache: &mut ResourceCache) -> Result<()> {
        self.client
            .request::<(), serde_json::Value>(Method::DELETE, &format!("archives/{}", id), None)
            .await?;
        cache.invalidate_family(ARCHIVES_RESOURCE);
        Ok(())
    }

    pub async fn set_favorite(
        &self,
        id: i64,
        favorite: bool,
        cache: &mut ResourceCache,
    ) -> Result<()> {
        self.client
            .request::<SetFavoriteRequest, serde_json::Value>(
                Method::PUT,
                &format!("archives/{}/favorite", id),
                Some(&SetFavoriteRequest { favorite }),
            )
            .await?;
        cache.invalidate_family(ARCHIVES_RESOURCE);
        Ok(())
    }

    pub async fn update_tags(
        &self,
        id: i64,
        tags: &str,
        cache: &mut ResourceCache,
    ) -> Result<()> {
        let request = UpdateTagsRequest {
            tags: tags.to_string(),
        };
        request.validate()?;

        self.client
            .request::<UpdateTagsRequest, serde_json::Value>(
                Method::PUT,
                &format!("archives/{}/tags", id),
                Some(&request),
            )
            .await?;
        cache.invalidate_family(ARCHIVES_RESOURCE);
        Ok(())
    }

    pub async fn assign_project(
        &self,
        id: i64,
        project_id: Option<i64>,
        cache: &mut ResourceCache,
    ) -> Result<()> {
        self.client
            .request::<AssignProjectRequest, serde_json::Value>(
                Method::PUT,
                &format!("archives/{}/project", id),
                Some(&AssignProjectRequest { project_id }),
            )
            .await?;
        cache.invalidate_family(ARCHIVES_RESOURCE);
        Ok(())
    }

    pub async fn list_projects(&self, cache: &mut ResourceCache) -> Result<Vec<ProjectListItem>> {
        if let Some(projects) = cache.get::<Vec<ProjectListItem>>("projects") {
            return Ok(projects);
        }
        let response: ProjectListResponse = self
            .client
            .request::<(), ProjectListResponse>(Method::GET, "projects", None)
            .await?
            .into_data()?;
        cache.put("projects", &response.projects)?;
        Ok(response.projects)
    }

    pub async fn list_tags(&self, cache: &mut ResourceCache) -> Result<Vec<TagInfo>> {
        if let Some(tags) = cache.get::<Vec<TagInfo>>("tags") {
            return Ok(tags);
        }
        let response: TagListResponse = self
            .client
            .request::<(), TagListResponse>(Method::GET, "tags", None)
            .await?
            .into_data()?;
        cache.put("tags", &response.tags)?;
        Ok(response.tags)
    }
}
