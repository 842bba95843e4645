//! Archive API DTOs
//!
//! Mutations apply exactly one field change to one archive id and are
//! idempotent at that level; the server is the source of truth and the
//! client refetches after a mutation succeeds.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::common::{Archive, ProjectListItem, TagInfo};

/// List archives response
///
/// Response for GET /archives, optionally scoped by `?printer_id=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveListResponse {
    pub archives: Vec<Archive>,
    pub total_count: usize,
}

/// Replace the tag list of one archive
///
/// Used for PUT /archives/{id}/tags. Tags travel as one comma-separated
/// string, matching the stored representation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTagsRequest {
    #[validate(length(max = 1024))]
    pub tags: String,
}

/// Set the favorite flag of one archive
///
/// Used for PUT /archives/{id}/favorite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFavoriteRequest {
    pub favorite: bool,
}

/// Assign (or clear) the project of one archive
///
/// Used for PUT /archives/{id}/project; `None` detaches the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignProjectRequest {
    pub project_id: Option<i64>,
}

/// List projects response for GET /projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectListItem>,
}

/// List tags response for GET /tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagListResponse {
    pub tags: Vec<TagInfo>,
}
